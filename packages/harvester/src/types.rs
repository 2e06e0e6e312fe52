//! Core data types for the harvester.

use serde::{Deserialize, Serialize};

/// CSV column headers, in output order.
pub const COLUMNS: [&str; 6] = [
    "FinInstrmGnlAttrbts.Id",
    "FinInstrmGnlAttrbts.FullNm",
    "FinInstrmGnlAttrbts.ClssfctnTp",
    "FinInstrmGnlAttrbts.CmmdtyDerivInd",
    "FinInstrmGnlAttrbts.NtnlCcy",
    "Issr",
];

/// One financial instrument row of the tabular dataset.
///
/// Field order is the CSV column order. Note that the commodity-derivative
/// indicator precedes the notional currency here, the reverse of their
/// order in the source XML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Instrument identifier (ISIN).
    #[serde(rename = "FinInstrmGnlAttrbts.Id")]
    pub id: String,

    /// Full instrument name.
    #[serde(rename = "FinInstrmGnlAttrbts.FullNm")]
    pub full_name: String,

    /// CFI classification code.
    #[serde(rename = "FinInstrmGnlAttrbts.ClssfctnTp")]
    pub classification_type: String,

    /// Commodity derivative indicator (`true`/`false`).
    #[serde(rename = "FinInstrmGnlAttrbts.CmmdtyDerivInd")]
    pub commodity_derivative_indicator: String,

    /// Notional currency code.
    #[serde(rename = "FinInstrmGnlAttrbts.NtnlCcy")]
    pub notional_currency: String,

    /// Issuer LEI.
    #[serde(rename = "Issr")]
    pub issuer: String,
}

impl InstrumentRecord {
    /// Values in column order.
    #[must_use]
    pub fn to_row(&self) -> [&str; 6] {
        [
            self.id.as_str(),
            self.full_name.as_str(),
            self.classification_type.as_str(),
            self.commodity_derivative_indicator.as_str(),
            self.notional_currency.as_str(),
            self.issuer.as_str(),
        ]
    }
}
