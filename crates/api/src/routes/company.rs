//! Route definitions for companies and the company-type taxonomy.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{company, company_type};
use crate::state::AppState;

/// ```text
/// GET    /companies                      -> index
/// POST   /companies                      -> store
/// GET    /companies/{id}                 -> show
/// PUT    /companies/{id}                 -> update
/// DELETE /companies/{id}                 -> destroy
/// GET    /all_companies                  -> all
/// POST   /companies/importCompany        -> import
/// GET    /companies/download-template    -> download_template
/// POST   /companies/send-brochure        -> send_brochure
///
/// GET    /company-types                  -> company_type::index
/// DELETE /company-types                  -> company_type::destroy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies", get(company::index).post(company::store))
        .route(
            "/companies/{id}",
            get(company::show)
                .put(company::update)
                .delete(company::destroy),
        )
        .route("/all_companies", get(company::all))
        .route("/companies/importCompany", post(company::import))
        .route(
            "/companies/download-template",
            get(company::download_template),
        )
        .route("/companies/send-brochure", post(company::send_brochure))
        .route(
            "/company-types",
            get(company_type::index).delete(company_type::destroy),
        )
}
