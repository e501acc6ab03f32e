//! Per-service cost query builder.

use crate::athena::QueryRequest;
use crate::config::QueryConfig;

/// Sum of unblended cost for one product code over a usage window.
///
/// The result set has one data row: `(line_item_product_code, sum_unblended_cost)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
    pub table: String,
    pub service: String,
    pub start_date: String,
    pub end_date: String,
}

impl CostQuery {
    pub fn from_config(config: &QueryConfig) -> Self {
        Self {
            table: config.table.clone(),
            service: config.service.clone(),
            start_date: config.start_date.clone(),
            end_date: config.end_date.clone(),
        }
    }

    /// Renders the SQL text.
    pub fn to_sql(&self) -> String {
        format!(
            "SELECT line_item_product_code, \
             round(sum(cast(line_item_unblended_cost AS double)),2) AS sum_unblended_cost \
             FROM {table} \
             where line_item_product_code='{service}' \
             and line_item_usage_start_date between timestamp '{start}' AND timestamp '{end}' \
             GROUP BY line_item_product_code",
            table = self.table,
            service = quote_literal(&self.service),
            start = self.start_date,
            end = self.end_date,
        )
    }

    /// Pairs the SQL with the output location to form a submittable request.
    pub fn to_request(&self, output_location: &str) -> QueryRequest {
        QueryRequest::new(self.to_sql(), output_location)
    }
}

/// Escapes a value for use inside a single-quoted SQL literal.
fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_query_text() {
        let query = CostQuery::from_config(&QueryConfig::default());

        assert_eq!(
            query.to_sql(),
            "SELECT line_item_product_code, round(sum(cast(line_item_unblended_cost AS double)),2) \
             AS sum_unblended_cost FROM athenacurcfn_a_w_s_c_u_r.varsh where \
             line_item_product_code='AmazonS3' and line_item_usage_start_date between \
             timestamp '2022-03-01' AND timestamp '2022-04-01' GROUP BY line_item_product_code"
        );
    }

    #[test]
    fn test_service_quotes_are_escaped() {
        let query = CostQuery {
            service: "Amazon'S3".to_string(),
            ..CostQuery::from_config(&QueryConfig::default())
        };

        assert!(query.to_sql().contains("line_item_product_code='Amazon''S3'"));
    }

    #[test]
    fn test_to_request_keeps_output_location() {
        let query = CostQuery::from_config(&QueryConfig::default());
        let request = query.to_request("s3://bucket/prefix/");

        assert_eq!(request.output_location(), "s3://bucket/prefix/");
        assert_eq!(request.query(), query.to_sql());
    }
}
