//! Quantifiable-achievement census.

use serde::Serialize;

use crate::config::DetectionThresholds;

const MAX_EXAMPLES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCounts {
  pub percentages: usize,
  pub currency: usize,
  pub quantities: usize,
  pub ranges: usize,
  pub multipliers: usize,
}

impl MetricCounts {
  pub fn total(&self) -> usize {
    self.percentages + self.currency + self.quantities + self.ranges + self.multipliers
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSignal {
  pub count: usize,
  pub by_kind: MetricCounts,
  pub examples: Vec<String>,
  pub is_optimal: bool,
  pub message: String,
}

pub fn detect(text: &str, t: &DetectionThresholds) -> MetricsSignal {
  let percent = regex!(r"\b\d+(?:\.\d+)?\s?%");
  let currency = regex!(
    r"(?i)[$€£¥]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:k|m|mm|b|bn|million|billion|thousand)\b)?"
  );
  let quantity = regex!(
    r"(?i)\b\d[\d,]*\+?\s+(?:years?|months?|team\s+members|engineers|developers|people|employees|clients|customers|users|projects|countries|hours|stakeholders|direct\s+reports|members|products|stores|locations)\b|\bteam\s+of\s+\d+\b"
  );
  let range = regex!(
    r"(?i)\bfrom\s+[$€£]?\d[\d,.]*\s?(?:%|k|m)?\s+to\s+[$€£]?\d[\d,.]*\s?(?:%|k|m)?"
  );
  let multiplier = regex!(r"(?i)\b\d+(?:\.\d+)?x\b");

  let mut examples: Vec<String> = Vec::new();
  let mut census = |re: &regex::Regex| -> usize {
    let mut n = 0;
    for m in re.find_iter(text) {
      n += 1;
      if examples.len() < MAX_EXAMPLES {
        examples.push(m.as_str().trim().to_string());
      }
    }
    n
  };

  let by_kind = MetricCounts {
    percentages: census(percent),
    currency: census(currency),
    quantities: census(quantity),
    ranges: census(range),
    multipliers: census(multiplier),
  };

  let count = by_kind.total();
  let is_optimal = count >= t.metrics_optimal;
  let message = if count == 0 {
    "No quantifiable achievements".to_string()
  } else {
    format!("{} quantifiable achievement(s)", count)
  };

  MetricsSignal {
    count,
    by_kind,
    examples,
    is_optimal,
    message,
  }
}
