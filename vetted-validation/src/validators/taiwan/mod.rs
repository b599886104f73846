//! Taiwan identifiers, phone numbers and postal codes
//!
//! Every validator has a matching `is_valid_*` function for plain boolean
//! checks.
//!
//! ```
//! use vetted_validation::taiwan::{find_area_code, is_valid_tel, postal_city};
//!
//! assert!(is_valid_tel("02-2345-6789"));
//! assert_eq!(find_area_code("0492345678").map(|a| a.code), Some("049"));
//! assert_eq!(postal_city("106"), Some("Taipei City"));
//! ```

mod business_id;
mod fax;
mod mobile;
mod national_id;
mod postal_code;
mod tel;

pub use business_id::{BusinessIdOptions, BusinessIdValidator, is_valid_business_id};
pub use fax::{FaxOptions, FaxValidator, is_valid_fax};
pub use mobile::{MobileOptions, MobileValidator, is_valid_mobile};
pub use national_id::{
    NationalIdKind, NationalIdOptions, NationalIdType, NationalIdValidator, city_code,
    detect_national_id_type, is_valid_citizen_id, is_valid_national_id, is_valid_resident_id,
};
pub use postal_code::{
    PostalCodeOptions, PostalCodeValidator, PostalFormat, is_valid_postal_code, postal_city,
    suffix_range,
};
pub use tel::{AREA_CODES, AreaCode, TelOptions, TelValidator, find_area_code, is_valid_tel, phone_digits};
