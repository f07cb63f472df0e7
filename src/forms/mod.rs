//! Form helpers shared by the listing and signup pages

pub mod autocomplete;
pub mod listing;
pub mod signup;

pub use autocomplete::{AutocompleteField, SuggestionKind, SuggestionSource};
pub use listing::ProductListingForm;
pub use signup::SignupForm;
