pub mod quotes;
pub mod rate_cards;

use axum::extract::{rejection::JsonRejection, Json};

use crate::error::{invalid_input_error, Error};

type Body<T> = Result<Json<T>, JsonRejection>;

fn json_body<T>(body: Body<T>) -> Result<T, Error> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(%rejection, "rejected request body");
            Err(invalid_input_error(rejection.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EstimateRequest;
    use axum::{
        body::Body as HttpBody,
        extract::{FromRequest, RequestParts},
        http::{Request, StatusCode},
    };
    use tokio_test::block_on;

    fn extract(body: &'static str) -> Result<EstimateRequest, Error> {
        let request = Request::builder()
            .method("POST")
            .uri("/quotes")
            .header("content-type", "application/json")
            .body(HttpBody::from(body))
            .unwrap();

        block_on(async {
            let mut parts = RequestParts::new(request);
            json_body(Json::<EstimateRequest>::from_request(&mut parts).await)
        })
    }

    #[test]
    fn malformed_bodies_are_invalid_input() {
        for body in [
            r#"{"origin": {"lat": 1}}"#,
            r#"{"vehicleIds": ["not-a-uuid"]}"#,
            "not json",
        ] {
            let err = extract(body).unwrap_err();
            assert_eq!(err.code, 101, "{}", body);
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn well_formed_body_passes_through() {
        let request = extract(r#"{"origin": {"lat": 12.97, "lng": 77.59}, "waitingTimeInMinutes": 3}"#)
            .unwrap();

        assert!(request.origin.is_some());
        assert_eq!(request.waiting_time_in_minutes, Some(3.0));
    }
}
