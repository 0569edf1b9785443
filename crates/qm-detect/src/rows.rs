//! Row parser for product listing exports.
//!
//! Deliberately simple: one record per line, values split on bare commas.
//! Quoted fields and embedded commas are not supported.

use qm_core::ProductRecord;

use crate::error::DetectError;

/// Core fields a header column can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Description,
    Image,
    Vendor,
}

/// Header substrings per field, in claim order.
const FIELD_NEEDLES: &[(Field, &[&str])] = &[
    (Field::Id, &["id"]),
    (Field::Name, &["name", "title"]),
    (Field::Description, &["desc"]),
    (Field::Image, &["image", "img", "photo", "url"]),
    (Field::Vendor, &["vendor", "supplier", "seller", "consignor"]),
];

/// Parse delimited product text into records.
///
/// The first line is the header. Each core field claims the first header
/// whose lowercase name contains one of its needles; a header is claimed by
/// at most one field. Unclaimed columns land in [`ProductRecord::extra`].
/// Rows without an id get a generated UUID.
///
/// # Errors
///
/// Returns [`DetectError::MalformedInput`] if the text does not contain a
/// header line followed by at least one non-blank data line.
pub fn parse_products(text: &str) -> Result<Vec<ProductRecord>, DetectError> {
    let mut lines = text.lines().map(str::trim);

    let header_line = lines
        .by_ref()
        .find(|line| !line.is_empty())
        .ok_or_else(|| DetectError::MalformedInput("input is empty".to_string()))?;

    let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
    let mapping = map_headers(&headers);

    let products: Vec<ProductRecord> = lines
        .filter(|line| !line.is_empty())
        .map(|line| build_record(&headers, &mapping, line))
        .collect();

    if products.is_empty() {
        return Err(DetectError::MalformedInput(
            "expected a header row and at least one data row".to_string(),
        ));
    }

    tracing::debug!(
        rows = products.len(),
        columns = headers.len(),
        "parsed product rows"
    );

    Ok(products)
}

/// Resolves each header index to the core field it feeds, if any.
fn map_headers(headers: &[&str]) -> Vec<Option<Field>> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let mut mapping: Vec<Option<Field>> = vec![None; headers.len()];

    for (field, needles) in FIELD_NEEDLES {
        let claimed = lowered.iter().enumerate().position(|(i, header)| {
            mapping[i].is_none() && needles.iter().any(|needle| header.contains(needle))
        });
        if let Some(index) = claimed {
            mapping[index] = Some(*field);
        }
    }

    mapping
}

fn build_record(headers: &[&str], mapping: &[Option<Field>], line: &str) -> ProductRecord {
    let mut record = ProductRecord::new(String::new(), String::new());

    for ((header, field), value) in headers.iter().zip(mapping).zip(line.split(',')) {
        let value = value.trim();
        match field {
            Some(Field::Id) => record.id = value.to_string(),
            Some(Field::Name) => record.name = value.to_string(),
            Some(Field::Description) => record.description = value.to_string(),
            Some(Field::Image) => record.image_url = Some(value.to_string()),
            Some(Field::Vendor) => record.vendor = Some(value.to_string()),
            None => {
                record.extra.insert((*header).to_string(), value.to_string());
            }
        }
    }

    if record.id.is_empty() {
        record.id = uuid::Uuid::new_v4().to_string();
    }

    record
}
