pub mod index_service;
pub mod movers_service;
