mod coerce;
mod prompt;
mod ranker;
mod types;

pub use coerce::{coerce, ParseError};
pub use prompt::{build_details_prompt, build_diagnosis_prompt};
pub use ranker::{extract_conditions, rank, summarize, NO_DIAGNOSIS};
pub use types::{
    format_likelihood, Condition, DetailQuery, DetailsRequest, DiagnosisResult, PetProfile,
    VeterinaryDetail,
};
