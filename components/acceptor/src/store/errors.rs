use crate::paxos::AcceptorId;
use storage::StorageError;

quick_error! {
    /// StoreError is a failure to open the record store. An acceptor must not start with it.
    #[derive(Debug, PartialEq, Eq)]
    pub enum StoreError {
        Storage(e: StorageError) {
            from(e: StorageError) -> (e)
            display("storage error: {}", e)
        }

        IOError(msg: String) {
            from(e: std::io::Error) -> (format!("{}", e))
            display("io error: {}", msg)
        }

        BadPath(path: String) {
            display("storage path is not valid utf-8: {}", path)
        }

        /// Recovery is requested but there is nothing to recover from.
        RecoveryMissing(path: String) {
            display("recovery failed: {} does not exist", path)
        }

        RecoverInMemory {
            display("recovery is not possible with durability none")
        }

        /// The recovered storage belongs to another acceptor.
        IdentityMismatch(stored: Option<AcceptorId>, configured: AcceptorId) {
            display("storage belongs to acceptor {:?}, not to acceptor {}", stored, configured)
        }
    }
}
