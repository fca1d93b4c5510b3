use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body accepted by the edge service
///
/// POST /cep
/// ```json
/// { "cep": "01310-100" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CepRequest {
    #[validate(length(min = 1))]
    pub cep: String,
}
