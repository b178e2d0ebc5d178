use revmod_core::entities::{EmailContent, Review, Tally};

const EXCERPT_LEN: usize = 200;

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LEN) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_owned(),
    }
}

fn subject_review_conflict(review: &Review) -> String {
    format!("Review conflict requires arbiter resolution - review {}", review.id)
}

pub fn review_conflict_email(review: &Review, tally: &Tally) -> EmailContent {
    let subject = subject_review_conflict(review);
    let body = format!(
        "The supervisors could not agree on a review.\n\
         \n\
         Review details:\n\
         - Review: {id}\n\
         - Item: {item}\n\
         - Author: {author}\n\
         - Title: {title}\n\
         - Content: {content}\n\
         \n\
         Votes:\n\
         - Supervisors: {total}\n\
         - Approvals: {approved}\n\
         - Rejections: {rejected}\n\
         \n\
         Please resolve the conflict as an arbiter.\n",
        id = review.id,
        item = review.item_id,
        author = review.author_id,
        title = review.content.title.as_deref().unwrap_or("No title"),
        content = excerpt(&review.content.body),
        total = tally.total_supervisors,
        approved = tally.approved,
        rejected = tally.rejected,
    );
    EmailContent { subject, body }
}
