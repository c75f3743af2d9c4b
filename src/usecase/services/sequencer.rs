/// Tags asynchronous work so only the most recently issued request may apply
/// its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequencer {
    latest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl RequestSequencer {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}
