use crate::models::ChatPreview;

/// Canonical conversation identity: the pair ordered by numeric id, so a
/// lookup is direction-independent. Caller must reject a == b first.
pub fn canonical_pair(a: i64, b: i64) -> (i64, i64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Builds the inbox sidebar ordering from per-conversation previews.
///
/// Deduplicates by chat id (the later duplicate wins), then sorts entries
/// with a last message descending by send time. Conversations with no
/// messages yet go to the back, newest chat id first.
pub fn build_inbox(entries: Vec<ChatPreview>) -> Vec<ChatPreview> {
    let mut deduped: Vec<ChatPreview> = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(existing) = deduped.iter_mut().find(|e| e.chat_id == entry.chat_id) {
            *existing = entry;
        } else {
            deduped.push(entry);
        }
    }

    deduped.sort_by(|a, b| match (&b.last_sent_at, &a.last_sent_at) {
        (Some(b_time), Some(a_time)) => b_time.cmp(a_time),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => b.chat_id.cmp(&a.chat_id),
    });

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn preview(chat_id: i64, last_sent_at: Option<i64>) -> ChatPreview {
        ChatPreview {
            chat_id,
            partner_id: chat_id + 100,
            partner_username: format!("user{}", chat_id),
            last_message: last_sent_at.map(|_| "hey".to_string()),
            last_sender_id: last_sent_at.map(|_| 1),
            last_sent_at: last_sent_at.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
        }
    }

    #[test]
    fn canonical_pair_orders_by_id() {
        assert_eq!(canonical_pair(1, 2), (1, 2));
        assert_eq!(canonical_pair(2, 1), (1, 2));
        assert_eq!(canonical_pair(42, 7), (7, 42));
    }

    #[test]
    fn inbox_sorts_descending_by_send_time() {
        let inbox = build_inbox(vec![
            preview(1, Some(100)),
            preview(2, Some(300)),
            preview(3, Some(200)),
        ]);
        let order: Vec<i64> = inbox.iter().map(|e| e.chat_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn inbox_later_duplicate_wins() {
        let mut stale = preview(1, Some(100));
        stale.last_message = Some("old".to_string());
        let mut fresh = preview(1, Some(500));
        fresh.last_message = Some("new".to_string());

        let inbox = build_inbox(vec![stale, fresh, preview(2, Some(200))]);
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].chat_id, 1);
        assert_eq!(inbox[0].last_message.as_deref(), Some("new"));
    }

    #[test]
    fn inbox_empty_chats_sort_last() {
        let inbox = build_inbox(vec![
            preview(5, None),
            preview(1, Some(100)),
            preview(9, None),
        ]);
        let order: Vec<i64> = inbox.iter().map(|e| e.chat_id).collect();
        assert_eq!(order, vec![1, 9, 5]);
    }
}
