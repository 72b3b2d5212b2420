use crate::models::resume::WorkExperienceEntry;

/// Extracts the year from a free-text date shaped like "<Month> <Year>".
///
/// Takes the token after the first space and reads its leading digits, so
/// "Jan 2020" and "March 2019," both parse. The input is not trimmed: a leading
/// space makes the month the second token. Anything else returns `None`.
pub fn parse_year(date: &str) -> Option<i32> {
    let token = date.split(' ').nth(1)?;
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Rough years of experience, summed per position.
///
/// A position without a parseable start year contributes nothing. A missing or
/// unparseable end date ("Present") counts up to `current_year`. An end year
/// before the start year subtracts from the total.
pub fn experience_years(work: &[WorkExperienceEntry], current_year: i32) -> i64 {
    work.iter()
        .map(|job| position_years(job, current_year))
        .sum()
}

fn position_years(job: &WorkExperienceEntry, current_year: i32) -> i64 {
    let Some(start) = job.start_date.as_deref().and_then(parse_year) else {
        return 0;
    };
    let end = job
        .end_date
        .as_deref()
        .and_then(parse_year)
        .unwrap_or(current_year);

    i64::from(end) - i64::from(start)
}
