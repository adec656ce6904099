//! Totals over a filtered set, shown in the dashboard's summary cards

use serde::Serialize;
use utoipa::ToSchema;

use super::record::SaleRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_records: u64,
    /// Sum of Quantity
    pub total_units: i64,
    /// Sum of Final Amount
    pub total_amount: f64,
    /// Sum of Total Amount minus Final Amount
    pub total_discount: f64,
}

impl SalesStats {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SaleRecord>,
    {
        records.into_iter().fold(Self::default(), |mut acc, r| {
            acc.total_records += 1;
            acc.total_units += r.quantity;
            acc.total_amount += r.final_amount;
            acc.total_discount += r.discount_amount();
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let records = [
            SaleRecord {
                quantity: 2,
                total_amount: 200.0,
                final_amount: 180.0,
                ..Default::default()
            },
            SaleRecord {
                quantity: 5,
                total_amount: 50.0,
                final_amount: 50.0,
                ..Default::default()
            },
        ];
        let stats = SalesStats::from_records(&records);
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.total_units, 7);
        assert_eq!(stats.total_amount, 230.0);
        assert_eq!(stats.total_discount, 20.0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(SalesStats::from_records(&[]), SalesStats::default());
    }
}
