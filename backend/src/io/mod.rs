//! # IO Module
//!
//! Adapter layer between clients and the domain. It exposes the REST
//! endpoints, converts between JSON DTOs and domain types and maps domain
//! errors to HTTP status codes.
//!
//! ## Supported Operations
//!
//! - **GET /api/expenses**, **POST /api/expenses**, **DELETE /api/expenses/:id**
//! - **GET /api/savings**, **POST /api/savings**, **POST /api/savings/reset**
//! - **GET /api/summary**
//! - **GET /health**

pub mod rest;

pub use rest::*;
