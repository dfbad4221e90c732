//! Indicator value series for many instruments.

use serde::Serialize;
use stockex_core::error::StockexResult;
use stockex_core::traits::{Indicator, PriceProvider};
use stockex_core::types::{IndicatorType, IndicatorValue, InstrumentId};
use tracing::{debug, warn};

/// One instrument's indicator values.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentIndicatorValues {
    pub instrument_id: InstrumentId,
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorValue>,
}

/// Compute an indicator over the full history of each instrument.
///
/// Instruments without data, or whose calculation fails, are logged and
/// left out. The rest keep the requested order.
pub async fn compute_indicator_values(
    provider: &dyn PriceProvider,
    indicator: &dyn Indicator,
    instruments: &[InstrumentId],
) -> StockexResult<Vec<InstrumentIndicatorValues>> {
    let histories = provider.get_prices_for(instruments).await?;
    let indicator_type = indicator.indicator_type();

    let mut results = Vec::with_capacity(instruments.len());
    for &instrument in instruments {
        let Some(prices) = histories.get(&instrument) else {
            warn!(instrument, indicator = %indicator_type, "No prices for instrument");
            continue;
        };

        match indicator.calculate(prices) {
            Ok(values) => {
                debug!(instrument, indicator = %indicator_type, values = values.len(), "Computed indicator values");
                results.push(InstrumentIndicatorValues {
                    instrument_id: instrument,
                    indicator_type,
                    values,
                });
            }
            Err(e) => warn!(
                instrument,
                indicator = %indicator_type,
                error = %e,
                "Indicator calculation failed"
            ),
        }
    }

    Ok(results)
}
