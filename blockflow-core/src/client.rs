/// Connection lifecycle for external system clients.
///
/// Implementors consume the unconnected client and return a connected one,
/// so a client that reaches task code is always ready to use.
pub trait Client {
    type Error;
    fn connect(self) -> impl std::future::Future<Output = Result<Self, Self::Error>> + Send
    where
        Self: Sized;
}
