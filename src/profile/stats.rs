//! Statistics derived from the repository list

use super::LanguageShare;
use crate::github::GitHubRepo;

/// Number of languages kept in the ranking
pub const TOP_LANGUAGES: usize = 5;

/// Sum of stars across every owned repository, forks included
pub fn total_stars(repos: &[GitHubRepo]) -> u64 {
    repos.iter().map(|repo| repo.stargazers_count).sum()
}

/// Language ranking over non-fork repositories that declare a language.
///
/// Each percentage is `round(count / total * 100)`. Entries are sorted by
/// percentage, descending; equal percentages keep first-seen order. At most
/// [`TOP_LANGUAGES`] entries are returned.
pub fn top_languages(repos: &[GitHubRepo]) -> Vec<LanguageShare> {
    // Vec keeps insertion order for tie-breaking
    let mut counts: Vec<(&str, u64)> = Vec::new();
    for language in repos
        .iter()
        .filter(|repo| !repo.fork)
        .filter_map(|repo| repo.language.as_deref())
    {
        match counts.iter_mut().find(|(name, _)| *name == language) {
            Some((_, count)) => *count += 1,
            None => counts.push((language, 1)),
        }
    }

    let total = counts.iter().map(|(_, count)| count).sum::<u64>().max(1);

    let mut shares: Vec<LanguageShare> = counts
        .into_iter()
        .map(|(name, count)| LanguageShare {
            name: name.to_string(),
            percentage: ((count as f64 / total as f64) * 100.0).round() as u32,
        })
        .collect();

    // sort_by is stable
    shares.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    shares.truncate(TOP_LANGUAGES);
    shares
}
