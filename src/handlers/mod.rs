pub mod customers;
pub mod orders;

use actix_web::HttpRequest;
use uuid::Uuid;

use crate::errors::AppError;

pub(crate) const USER_ID_HEADER: &str = "X-User-Id";

/// The authentication layer in front of this service resolves the caller and
/// forwards its id in `X-User-Id`; the worker endpoints trust that header.
pub(crate) fn acting_user_id(req: &HttpRequest) -> Result<Uuid, AppError> {
    let header = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::Forbidden(format!("Missing {USER_ID_HEADER} header")))?;
    let value = header
        .to_str()
        .map_err(|_| AppError::InvalidInput(format!("{USER_ID_HEADER} header is not valid text")))?;
    Uuid::parse_str(value)
        .map_err(|_| AppError::InvalidInput(format!("{USER_ID_HEADER} header must be a UUID")))
}
