pub mod connection_queries;
