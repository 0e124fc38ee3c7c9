pub mod connection;

pub use connection::InMemoryConnectionRepository;
