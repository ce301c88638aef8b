//! Data access for Bureau of Indian Affairs and US Fish & Wildlife Service
//! web endpoints: tribal leaders, BIA region boundaries, the USFWS Corporate
//! Master Table and the FWS taxonomy service, including best-match
//! resolution of scientific names.
pub mod bia;
pub mod cli;
pub mod cmt;
pub mod config;
pub mod csv_handler;
pub mod error;
pub mod fws;
pub mod geo;
pub mod http;
pub mod logging;
pub mod table;
pub mod taxon;

pub use error::{CrateError, Result};
