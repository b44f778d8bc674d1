//! Synthetic identity-document values: Brazilian IBANs with ISO 7064 MOD 97-10
//! check digits and ICAO 9303 TD3 passport MRZ lines.

pub mod audit;
pub mod bban;
pub mod iban;
pub mod icao;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod mod97;
pub mod mrz;
pub mod mrz_batch;
pub mod mrz_field;
pub mod passport;
pub mod reference;
pub mod util;

pub use iban::{generate_ibans, IbanCountry};
pub use mod97::verify_iban;
pub use models::{Mrz, MrzInput, MrzRowResult, RowIssue, Sex};
pub use mrz::build_mrz;
pub use mrz_batch::{generate_mrz, generate_mrz_batch, DateFormat};
