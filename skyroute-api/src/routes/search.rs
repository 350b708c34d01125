/// Flight search
///
/// ```text
/// GET /search-flights?origin=Chennai&destination=Delhi&departure_date=2025-07-01
/// GET /search-flights?origin=Chennai&destination=Delhi&departure_date=2025-07-01&return_date=2025-07-05&round_trip=true
/// ```
///
/// Responds with the bookable legs, outbound first, each tagged with the date
/// to book it for. Dates are checked against the server's current UTC date.

use crate::{app::AppState, error::ApiResult, extract::ApiQuery};
use axum::{extract::State, Json};
use chrono::Utc;
use skyroute_shared::{
    models::flight::Flight,
    search::{filter_flights, FlightMatch, SearchQuery},
};
use tracing::debug;

pub async fn search_flights(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<FlightMatch>>> {
    let search = query.validate(Utc::now().date_naive())?;

    let flights = Flight::list(&state.db).await?;
    let matches = filter_flights(&flights, &search);

    debug!(
        origin = %search.origin,
        destination = %search.destination,
        departure_date = %search.departure_date,
        matches = matches.len(),
        "Flight search"
    );

    Ok(Json(matches))
}
