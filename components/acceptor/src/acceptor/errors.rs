use crate::store::StoreError;
use storage::StorageError;

quick_error! {
    /// AcceptorError is a failure the acceptor can not recover from by itself, e.g. a batch
    /// that could not be persisted. The acceptor must stop after it.
    #[derive(Debug, PartialEq, Eq)]
    pub enum AcceptorError {
        Storage(e: StorageError) {
            from(e: StorageError) -> (e)
            display("storage failure: {}", e)
        }

        Store(e: StoreError) {
            from(e: StoreError) -> (e)
            display("record store: {}", e)
        }
    }
}
