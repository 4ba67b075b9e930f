use crate::record::BookRecord;

/// Render a record as labelled lines, `-` marking absent values
pub fn record_to_text(record: &BookRecord) -> String {
    let opt = |value: &Option<String>| value.as_deref().unwrap_or("-").to_string();
    let list = |values: &[String]| if values.is_empty() { "-".to_string() } else { values.join(", ") };

    let mut lines = vec![
        format!("Title: {}", record.title),
        format!("Original title: {}", opt(&record.original_title)),
        format!("Series: {}", opt(&record.series)),
        format!("Language: {}", opt(&record.language)),
        format!("Authors: {}", list(&record.authors)),
        format!("Average rating: {}", opt(&record.avg_rating)),
        format!("No. ratings: {}", opt(&record.num_ratings)),
        format!("No. reviews: {}", opt(&record.num_reviews)),
        format!("Genres: {}", list(&record.genres)),
        format!(
            "Description: {}",
            if record.description.is_empty() { "-" } else { record.description.as_str() }
        ),
    ];
    if let Some(url) = &record.url {
        lines.push(format!("URL: {}", url));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_text() {
        let record = BookRecord {
            series: Some("Earthsea Cycle".to_string()),
            authors: vec!["Ursula K. Le Guin".to_string()],
            genres: vec!["Fantasy".to_string(), "Classics".to_string()],
            ..BookRecord::new("A Wizard of Earthsea")
        };
        let text = record_to_text(&record);

        assert!(text.starts_with("Title: A Wizard of Earthsea\n"));
        assert!(text.contains("Series: Earthsea Cycle"));
        assert!(text.contains("Language: -"));
        assert!(text.contains("Genres: Fantasy, Classics"));
        assert!(text.ends_with("Description: -"));
    }

    #[test]
    fn test_record_to_text_with_url() {
        let record = BookRecord { url: Some("https://example.com/b/1".to_string()), ..BookRecord::new("Linked") };
        assert!(record_to_text(&record).ends_with("URL: https://example.com/b/1"));
    }
}
