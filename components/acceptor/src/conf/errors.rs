use crate::paxos::AcceptorId;

quick_error! {
    #[derive(Debug)]
    pub enum ConfError {
        IOError(e: std::io::Error) {
            from(e: std::io::Error) -> (e)
            display("can not read config: {}", e)
        }

        BadYaml(e: serde_yaml::Error) {
            from(e: serde_yaml::Error) -> (e)
            display("bad config yaml: {}", e)
        }

        TooManyAcceptors(n: u32, max: u32) {
            display("n_acceptors must be in [1, {}], but: {}", max, n)
        }

        InvalidAcceptorId(id: AcceptorId, n: u32) {
            display("invalid acceptor id: {}, must be in [0, {})", id, n)
        }

        RecoverWithoutDurability {
            display("recover is requested but durability is none: there is nothing to recover from")
        }

        Invalid(field: &'static str, problem: String) {
            display("invalid {}: {}", field, problem)
        }
    }
}

impl PartialEq<ConfError> for ConfError {
    fn eq(&self, other: &ConfError) -> bool {
        match (self, other) {
            (Self::IOError(a), Self::IOError(b)) => a.kind() == b.kind(),
            (Self::BadYaml(_), Self::BadYaml(_)) => true,
            (Self::TooManyAcceptors(a, b), Self::TooManyAcceptors(x, y)) => a == x && b == y,
            (Self::InvalidAcceptorId(a, b), Self::InvalidAcceptorId(x, y)) => a == x && b == y,
            (Self::RecoverWithoutDurability, Self::RecoverWithoutDurability) => true,
            (Self::Invalid(a, b), Self::Invalid(x, y)) => a == x && b == y,
            _ => false,
        }
    }
}
