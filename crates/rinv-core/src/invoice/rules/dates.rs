//! Issue date extraction from the full receipt text.

use chrono::NaiveDate;

use crate::error::ExtractionError;

use super::normalize::to_half_width;
use super::patterns::DATE_JP;
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor for `YYYY年M月D日` dates.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in DATE_JP.captures_iter(text) {
            let year: i32 = to_half_width(&caps[1]).parse().unwrap_or(0);
            let month: u32 = to_half_width(&caps[2]).parse().unwrap_or(0);
            let day: u32 = to_half_width(&caps[3]).parse().unwrap_or(0);

            if let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            {
                results.push(
                    ExtractionMatch::new(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// First valid printed date in the text.
pub fn extract_issue_date(text: &str) -> Option<NaiveDate> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

/// Parse a date given on the command line or in a config file.
///
/// Accepts ISO `YYYY-MM-DD`, `YYYY/MM/DD` and the printed `YYYY年M月D日`
/// form.
pub fn parse_date(value: &str) -> Result<NaiveDate, ExtractionError> {
    let trimmed = value.trim();
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| extract_issue_date(trimmed))
        .ok_or_else(|| ExtractionError::Parse {
            field: "date".to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_spaced_date() {
        assert_eq!(
            extract_issue_date("ご購入日 2024年 3月 5日 14:02"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn test_invalid_date_is_skipped() {
        let text = "2024年2月30日\n2024年2月29日";
        assert_eq!(extract_issue_date(text), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_position_is_recorded() {
        let found = DateExtractor::new().extract("日付:2023年12月1日").unwrap();
        assert_eq!(found.source, "2023年12月1日");
        assert!(found.position.is_some());
    }

    #[test]
    fn test_full_width_date() {
        let found = DateExtractor::new().extract("ご購入日 ２０２４年３月５日").unwrap();
        assert_eq!(found.value, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(found.source, "２０２４年３月５日");
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_issue_date("領収書"), None);
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date("2024-03-05").ok(), expected);
        assert_eq!(parse_date(" 2024年3月5日 ").ok(), expected);
        assert_eq!(parse_date("2024/03/05").ok(), expected);
        assert_eq!(parse_date("2024/3/5").ok(), expected);
        assert!(parse_date("2024/02/30").is_err());
        assert!(matches!(
            parse_date("05/03/2024"),
            Err(ExtractionError::Parse { .. })
        ));
    }
}
