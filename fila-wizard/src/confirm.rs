use fila_api::{ApiError, BookingApi, PaymentOutcome};

/// Post-redirect landing: hand the gateway's token back to the backend and
/// report the transaction outcome.
pub async fn confirm_payment(
    api: &dyn BookingApi,
    token: &str,
) -> Result<PaymentOutcome, ApiError> {
    let outcome = api.confirm_payment(token).await?;
    if outcome.success {
        tracing::info!("payment confirmed");
    } else {
        tracing::warn!("payment declined by the gateway");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fila_api::MockBookingApi;

    #[tokio::test]
    async fn test_confirmation_reports_the_outcome() {
        let api = MockBookingApi::new();
        let outcome = confirm_payment(&api, "tok_abc").await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.detail["token"], "tok_abc");
    }
}
