//! Financial instrument extraction from DLTINS working documents.
//!
//! A DLTINS file looks like this (namespaces omitted):
//!
//! ```text
//! <BizData>
//!   <Hdr>...</Hdr>
//!   <Pyld>
//!     <Document>
//!       <FinInstrmRptgRefDataDltaRpt>
//!         <RptHdr>...</RptHdr>
//!         <FinInstrm>
//!           <ModfdRcrd>
//!             <FinInstrmGnlAttrbts>
//!               <Id/> <FullNm/> <ShrtNm/> <ClssfctnTp/> <NtnlCcy/> <CmmdtyDerivInd/>
//!             </FinInstrmGnlAttrbts>
//!             <Issr/>
//!             ...
//! ```
//!
//! Records and fields are located by element position, not by name. Each
//! field has its own accessor so the lookup strategy can change without
//! touching callers.

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::{HarvesterError, Result};
use crate::types::InstrumentRecord;
use crate::xml::{element_at_path, element_children, format_path, get_tag_name, get_text};

/// Tag suffix identifying an instrument record.
const RECORD_MARKER: &str = "FinInstrm";

/// Position of the record container below the document root.
const RECORD_CONTAINER_PATH: [usize; 3] = [1, 0, 0];

/// A field reached by a fixed element-position path from its record.
struct PositionalField {
    name: &'static str,
    path: &'static [usize],
}

const IDENTIFIER: PositionalField = PositionalField {
    name: "Id",
    path: &[0, 0, 0],
};

const FULL_NAME: PositionalField = PositionalField {
    name: "FullNm",
    path: &[0, 0, 1],
};

// [0][0][2] holds the short name, which is not extracted.

const CLASSIFICATION_TYPE: PositionalField = PositionalField {
    name: "ClssfctnTp",
    path: &[0, 0, 3],
};

const NOTIONAL_CURRENCY: PositionalField = PositionalField {
    name: "NtnlCcy",
    path: &[0, 0, 4],
};

const COMMODITY_DERIVATIVE_INDICATOR: PositionalField = PositionalField {
    name: "CmmdtyDerivInd",
    path: &[0, 0, 5],
};

const ISSUER: PositionalField = PositionalField {
    name: "Issr",
    path: &[0, 1],
};

impl PositionalField {
    /// Read the field's text. A present element without text reads as "".
    fn read(&self, record: Node<'_, '_>) -> Result<String> {
        element_at_path(record, self.path)
            .map(get_text)
            .ok_or_else(|| HarvesterError::MissingElement {
                element: self.name.to_string(),
                context: format!("{RECORD_MARKER} at {}", format_path(self.path)),
            })
    }
}

/// Instrument identifier, at `[0][0][0]`.
pub fn identifier(record: Node<'_, '_>) -> Result<String> {
    IDENTIFIER.read(record)
}

/// Full instrument name, at `[0][0][1]`.
pub fn full_name(record: Node<'_, '_>) -> Result<String> {
    FULL_NAME.read(record)
}

/// Classification type, at `[0][0][3]`.
pub fn classification_type(record: Node<'_, '_>) -> Result<String> {
    CLASSIFICATION_TYPE.read(record)
}

/// Notional currency, at `[0][0][4]`.
pub fn notional_currency(record: Node<'_, '_>) -> Result<String> {
    NOTIONAL_CURRENCY.read(record)
}

/// Commodity derivative indicator, at `[0][0][5]`.
pub fn commodity_derivative_indicator(record: Node<'_, '_>) -> Result<String> {
    COMMODITY_DERIVATIVE_INDICATOR.read(record)
}

/// Issuer, at `[0][1]`.
pub fn issuer(record: Node<'_, '_>) -> Result<String> {
    ISSUER.read(record)
}

/// Read all six fields of one record.
pub fn read_record(record: Node<'_, '_>) -> Result<InstrumentRecord> {
    Ok(InstrumentRecord {
        id: identifier(record)?,
        full_name: full_name(record)?,
        classification_type: classification_type(record)?,
        commodity_derivative_indicator: commodity_derivative_indicator(record)?,
        notional_currency: notional_currency(record)?,
        issuer: issuer(record)?,
    })
}

/// Extract all instrument records from working document XML, in document
/// order.
///
/// # Errors
/// * `XmlParse` if the document is not well-formed
/// * `MissingElement` if the record container or any field of any record is
///   absent; no rows are returned in that case
///
/// # Examples
/// ```
/// use firds_harvester::instruments::extract_instruments;
///
/// let xml = r#"<BizData><Hdr/><Pyld><Document><Rpt>
///   <RptHdr/>
///   <FinInstrm><NewRcrd>
///     <Attrs><Id>X1</Id><FullNm>Name</FullNm><ShrtNm/><ClssfctnTp>C</ClssfctnTp>
///       <NtnlCcy>EUR</NtnlCcy><CmmdtyDerivInd>false</CmmdtyDerivInd></Attrs>
///     <Issr>LEI</Issr>
///   </NewRcrd></FinInstrm>
/// </Rpt></Document></Pyld></BizData>"#;
///
/// let rows = extract_instruments(xml).unwrap();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].notional_currency, "EUR");
/// ```
pub fn extract_instruments(xml: &str) -> Result<Vec<InstrumentRecord>> {
    let doc = Document::parse(xml)?;

    let container = element_at_path(doc.root_element(), &RECORD_CONTAINER_PATH).ok_or_else(
        || HarvesterError::MissingElement {
            element: "record container".to_string(),
            context: format!("document root at {}", format_path(&RECORD_CONTAINER_PATH)),
        },
    )?;

    let mut records = Vec::new();
    for (ordinal, node) in element_children(container)
        .filter(|n| get_tag_name(*n).ends_with(RECORD_MARKER))
        .enumerate()
    {
        let record = read_record(node).map_err(|e| match e {
            HarvesterError::MissingElement { element, context } => {
                HarvesterError::MissingElement {
                    element,
                    context: format!("{context} (record {})", ordinal + 1),
                }
            }
            other => other,
        })?;
        records.push(record);
    }

    tracing::debug!(count = records.len(), "Instrument records extracted");
    Ok(records)
}

/// Extract instrument records from a working document on disk.
pub fn extract_instruments_from_file(path: &Path) -> Result<Vec<InstrumentRecord>> {
    let xml = fs::read_to_string(path)?;
    let records = extract_instruments(&xml)?;
    tracing::info!(path = %path.display(), count = records.len(), "Instruments extracted");
    Ok(records)
}
