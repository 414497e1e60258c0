pub mod remote;

pub use remote::RemoteClient;
