use acceptor::conf::ConfError;
use acceptor::AcceptorError;

quick_error! {
    /// ServerError is why an acceptor process can not start or has to stop.
    #[derive(Debug)]
    pub enum ServerError {
        Conf(e: ConfError) {
            from(e: ConfError) -> (e)
            display("{}", e)
        }

        Acceptor(e: AcceptorError) {
            from(e: AcceptorError) -> (e)
            display("{}", e)
        }

        IOError(e: std::io::Error) {
            from(e: std::io::Error) -> (e)
            display("io error: {}", e)
        }

        BadArg(msg: String) {
            display("invalid argument: {}", msg)
        }
    }
}
