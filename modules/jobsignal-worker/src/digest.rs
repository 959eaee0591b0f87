//! HTML digest rendering. One table per source, built only from the new
//! (post-dedup) job sets — previously seen jobs never reappear here.

use jobsignal_common::JobRecord;

const HEADERS: [&str; 8] = [
    "Title",
    "Company",
    "Location",
    "Posted",
    "Terms",
    "Sponsorship",
    "Degrees",
    "Score",
];

/// Subject line with exact per-source counts of new jobs.
pub fn subject(new_simplify: usize, new_linkedin: usize) -> String {
    format!("Job digest: {new_simplify} new Simplify + {new_linkedin} new LinkedIn jobs")
}

pub fn render_digest(simplify_new: &[JobRecord], linkedin_new: &[JobRecord]) -> String {
    let mut html = String::from("<div style='font-family: Arial, sans-serif;'>");
    html.push_str(&render_table("Simplify Jobs", simplify_new));
    html.push_str(&render_table("LinkedIn Jobs", linkedin_new));
    html.push_str("</div>");
    html
}

fn render_table(title: &str, jobs: &[JobRecord]) -> String {
    if jobs.is_empty() {
        return format!("<h3>{}</h3><p>No new jobs found.</p>", escape(title));
    }

    let mut html = format!(
        "<h3 style=\"font-family: Arial; color: #333;\">{}</h3>\
         <table border=\"1\" cellpadding=\"8\" cellspacing=\"0\" \
         style=\"border-collapse: collapse; font-family: Arial, sans-serif; width: 100%;\">\
         <thead style=\"background-color: #f2f2f2;\"><tr>",
        escape(title)
    );
    for header in HEADERS {
        html.push_str(&format!("<th>{header}</th>"));
    }
    html.push_str("<th>Link</th></tr></thead><tbody>");

    for job in jobs {
        let posted = job
            .posted_at
            .map(|t| t.format("%m/%d/%Y").to_string())
            .unwrap_or_default();
        let score = job.score.map(|s| s.to_string()).unwrap_or_default();
        let link = if job.url.is_empty() {
            String::new()
        } else {
            format!("<a href=\"{}\">Link</a>", escape(&job.url))
        };

        html.push_str("<tr>");
        for cell in [
            &job.title,
            &job.company,
            &job.location,
            &posted,
            &job.terms,
            &job.sponsorship,
            &job.degrees,
            &score,
        ] {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str(&format!("<td>{link}</td></tr>"));
    }

    html.push_str("</tbody></table><br>");
    html
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
