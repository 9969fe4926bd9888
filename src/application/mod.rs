// Application layer: wire DTOs and order use cases

pub mod dto;
pub mod usecase;
