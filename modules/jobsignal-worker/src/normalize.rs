//! Pure per-source adapters into the canonical [`JobRecord`], plus the
//! recency filter for the listings feed. Missing fields normalize to empty
//! strings; nothing here fails.

use chrono::{DateTime, Duration, Utc};

use apify_client::LinkedInJob;
use jobsignal_common::{JobRecord, SimplifyListing, SourceTag};

pub fn normalize_simplify(listing: &SimplifyListing) -> JobRecord {
    JobRecord {
        source: SourceTag::Simplify,
        title: listing.title.clone().unwrap_or_default(),
        company: listing.company_name.clone().unwrap_or_default(),
        location: listing.locations.join(", "),
        url: listing.url.clone().unwrap_or_default(),
        posted_at: listing.posted_at(),
        terms: listing.terms.join(", "),
        sponsorship: listing.sponsorship.clone().unwrap_or_default(),
        degrees: listing.degrees.join(", "),
        score: None,
    }
}

pub fn normalize_linkedin(job: &LinkedInJob) -> JobRecord {
    // The actor reports posted time as a relative string ("2 hours ago"),
    // not a timestamp, so it rides along in the terms column.
    let terms = [job.contract_type.clone(), job.posted_time.clone()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    JobRecord {
        source: SourceTag::LinkedIn,
        title: job.title.clone().unwrap_or_default(),
        company: job.company_name.clone().unwrap_or_default(),
        location: job.location.clone().unwrap_or_default(),
        url: job.job_url.clone().unwrap_or_default(),
        posted_at: None,
        terms,
        sponsorship: String::new(),
        degrees: String::new(),
        score: None,
    }
}

/// A listing is "recent" iff it is active, visible, carries a parseable
/// posted-at timestamp, and that timestamp is at or after `now − window`.
/// Listings failing any check are silently excluded.
pub fn filter_recent(
    listings: Vec<SimplifyListing>,
    now: DateTime<Utc>,
    window_minutes: i64,
) -> Vec<SimplifyListing> {
    let cutoff = now - Duration::minutes(window_minutes);
    listings
        .into_iter()
        .filter(|l| l.active && l.is_visible)
        .filter(|l| matches!(l.posted_at(), Some(posted) if posted >= cutoff))
        .collect()
}
