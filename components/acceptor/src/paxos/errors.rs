use prost::DecodeError;

quick_error! {
    /// MessageError is why an inbound datagram is dropped.
    #[derive(Debug, PartialEq, Eq)]
    pub enum MessageError {
        Decode(err: String) {
            from(err: DecodeError) -> (format!("{}", err))
            display("malformed message: {}", err)
        }

        NoBody {
            display("message has no body or an unknown kind")
        }

        UnexpectedKind(kind: &'static str) {
            display("acceptor does not handle {} messages", kind)
        }
    }
}
