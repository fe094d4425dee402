//! Canonical ordering and reserved-label helpers for label sets.
//!
//! Storage layout and query responses must be reproducible across runs,
//! so labels and series are always handed out in the fixed orders
//! defined here: labels ascending by name, series ascending by the
//! value of the reserved metric name label.

use anyhow::{Result, bail};

use crate::parsing::prometheus::remote_write_models::{Label, TimeSeries};

/// Reserved label name carrying the metric name of a series.
pub const METRIC_NAME_LABEL: &str = "__name__";

/// Returns the value of the named label, or `""` when it is absent.
///
/// Matching and sorting both treat a missing label as the empty string,
/// so the two cases are deliberately indistinguishable here.
///
/// This is a plain linear scan. Label sets hold a handful of pairs, so
/// building a lookup structure per series would cost more than it
/// saves.
pub fn label_value<'a>(labels: &'a [Label], name: &str) -> &'a str {
    labels
        .iter()
        .find(|label| label.name == name)
        .map(|label| label.value.as_str())
        .unwrap_or("")
}

/// Returns the metric name of a label set, or `""` when the reserved
/// label is absent.
pub fn metric_name(labels: &[Label]) -> &str {
    label_value(labels, METRIC_NAME_LABEL)
}

/// Sorts labels in place, ascending by name in byte order.
pub fn sort_labels(labels: &mut [Label]) {
    labels.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Sorts time series in place, ascending by the value of their
/// `__name__` label. Series without the label sort first, under the
/// empty string.
///
/// The sort is stable: series sharing a metric name keep their relative
/// input order.
pub fn sort_time_series(series: &mut [TimeSeries]) {
    series.sort_by(|a, b| metric_name(&a.labels).cmp(metric_name(&b.labels)));
}

/// Checks that a label set is well formed: no empty names, no name
/// appearing twice.
///
/// Uniqueness is established here, at the ingest boundary; the identity
/// and ordering functions rely on it afterwards. Quadratic over the
/// set, which is fine at label-set sizes.
pub fn validate_labels(labels: &[Label]) -> Result<()> {
    for (i, label) in labels.iter().enumerate() {
        if label.name.is_empty() {
            bail!("label with empty name (value {:?})", label.value);
        }
        if labels[..i].iter().any(|earlier| earlier.name == label.name) {
            bail!("duplicate label name {:?}", label.name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{labels, time_series};

    #[test]
    fn test_label_value_lookup() {
        let set = labels(&[("code", "200"), ("__name__", "http_requests_total")]);
        assert_eq!(label_value(&set, "code"), "200");
        assert_eq!(label_value(&set, "handler"), "");
        assert_eq!(label_value(&[], "code"), "");
    }

    #[test]
    fn test_metric_name_lookup() {
        let set = labels(&[("code", "200"), ("__name__", "http_requests_total")]);
        assert_eq!(metric_name(&set), "http_requests_total");

        let nameless = labels(&[("code", "200")]);
        assert_eq!(metric_name(&nameless), "");

        assert_eq!(metric_name(&[]), "");
    }

    #[test]
    fn test_sort_labels_by_name() {
        let mut set = labels(&[("handler", "query"), ("__name__", "up"), ("code", "200")]);
        sort_labels(&mut set);

        let names: Vec<&str> = set.iter().map(|label| label.name.as_str()).collect();
        assert_eq!(names, ["__name__", "code", "handler"]);
    }

    #[test]
    fn test_sort_time_series_by_metric_name() {
        let mut series = vec![
            time_series(&[("__name__", "b")], &[]),
            time_series(&[("__name__", "a"), ("instance", "one")], &[]),
            time_series(&[("__name__", "a"), ("instance", "two")], &[]),
        ];
        sort_time_series(&mut series);

        let names: Vec<&str> = series.iter().map(|ts| metric_name(&ts.labels)).collect();
        assert_eq!(names, ["a", "a", "b"]);

        // Stable: the two "a" series keep their relative input order.
        assert_eq!(series[0].labels[1].value, "one");
        assert_eq!(series[1].labels[1].value, "two");
    }

    #[test]
    fn test_sort_time_series_without_name_label() {
        let mut series = vec![
            time_series(&[("__name__", "up")], &[]),
            time_series(&[("instance", "one")], &[]),
        ];
        sort_time_series(&mut series);

        // The nameless series sorts under "" and comes first.
        assert_eq!(metric_name(&series[0].labels), "");
        assert_eq!(metric_name(&series[1].labels), "up");
    }

    #[test]
    fn test_validate_labels() {
        assert!(validate_labels(&labels(&[("__name__", "up"), ("job", "node")])).is_ok());
        assert!(validate_labels(&[]).is_ok());

        let duplicated = labels(&[("job", "node"), ("job", "prometheus")]);
        let err = validate_labels(&duplicated).unwrap_err();
        assert!(err.to_string().contains("duplicate label name"));
        assert!(err.to_string().contains("job"));

        let empty_name = labels(&[("", "value")]);
        let err = validate_labels(&empty_name).unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn test_validate_allows_same_value_under_different_names() {
        let set = labels(&[("a", "x"), ("b", "x")]);
        assert!(validate_labels(&set).is_ok());
    }
}
