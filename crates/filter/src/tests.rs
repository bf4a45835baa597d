//! Tests for the notification filter.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use slotwatch_core::{AvailabilityResponse, Center, Session};

    use crate::{Classification, FilterState, NotificationFilter, NotificationKey, COOLDOWN_MS};

    /// Helper to build a center with the given sessions.
    fn make_center(id: u64, sessions: Vec<Session>) -> Center {
        Center {
            center_id: id,
            name: format!("Center {}", id),
            address: "1 Main Road".to_string(),
            pincode: "560001".to_string(),
            state_name: None,
            district_name: None,
            block_name: None,
            fee_type: None,
            sessions,
        }
    }

    /// Helper to build a session.
    fn make_session(age: u32, date: &str, capacity: i64) -> Session {
        Session {
            session_id: None,
            date: date.to_string(),
            min_age_limit: age,
            vaccine: "COVISHIELD".to_string(),
            available_capacity: capacity,
            available_capacity_dose1: None,
            available_capacity_dose2: None,
            slots: vec!["09:00AM-11:00AM".to_string()],
        }
    }

    fn c1_batch(capacity: i64) -> Vec<Center> {
        vec![make_center(1, vec![make_session(18, "10-5-2021", capacity)])]
    }

    fn c1_key() -> NotificationKey {
        NotificationKey::new(1, 18, "10-5-2021")
    }

    // -- capacity ----------------------------------------------------------

    #[test]
    fn zero_capacity_never_emitted() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();

        let outcome = filter.apply(&c1_batch(0), &mut state, 0);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.classification, Classification::NoNewSlots);
        assert!(state.is_empty());
    }

    #[test]
    fn negative_capacity_never_emitted() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();

        let outcome = filter.apply(&c1_batch(-3), &mut state, 0);
        assert!(outcome.records.is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn zero_capacity_ignored_even_after_cooldown() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        filter.apply(&c1_batch(5), &mut state, 0);

        let outcome = filter.apply(&c1_batch(0), &mut state, 10 * COOLDOWN_MS);
        assert!(outcome.records.is_empty());
        assert_eq!(state.last_notified(&c1_key()), Some(0));
    }

    // -- first sighting ----------------------------------------------------

    #[test]
    fn new_key_emits_once_and_records_now() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();

        let outcome = filter.apply(&c1_batch(5), &mut state, 42);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.classification, Classification::Approved(1));
        assert_eq!(state.last_notified(&c1_key()), Some(42));

        let record = &outcome.records[0];
        assert_eq!(record.center_id, 1);
        assert_eq!(record.center_name, "Center 1");
        assert_eq!(record.date, "10-5-2021");
        assert_eq!(record.age_limit, 18);
        assert_eq!(record.availability, 5);
    }

    // -- cooldown boundary -------------------------------------------------

    #[test]
    fn within_cooldown_is_suppressed_without_touching_state() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        filter.apply(&c1_batch(5), &mut state, 1_000);

        for now in [1_000, 2_000, 300_000, 1_000 + COOLDOWN_MS] {
            let outcome = filter.apply(&c1_batch(5), &mut state, now);
            assert!(outcome.records.is_empty(), "emitted at {now}");
            assert_eq!(state.last_notified(&c1_key()), Some(1_000));
        }
    }

    #[test]
    fn just_past_cooldown_emits_and_updates() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        filter.apply(&c1_batch(5), &mut state, 0);

        let outcome = filter.apply(&c1_batch(5), &mut state, COOLDOWN_MS + 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(state.last_notified(&c1_key()), Some(COOLDOWN_MS + 1));
    }

    #[test]
    fn capacity_change_does_not_reset_cooldown() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        filter.apply(&c1_batch(5), &mut state, 0);

        let outcome = filter.apply(&c1_batch(50), &mut state, 60_000);
        assert!(outcome.records.is_empty());
        assert_eq!(state.last_notified(&c1_key()), Some(0));
    }

    #[test]
    fn clock_going_backwards_never_approves() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        filter.apply(&c1_batch(5), &mut state, 900_000);

        let outcome = filter.apply(&c1_batch(5), &mut state, 100);
        assert!(outcome.records.is_empty());
        assert_eq!(state.last_notified(&c1_key()), Some(900_000));
    }

    #[test]
    fn three_tick_scenario() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();

        // Tick 1 at t=0.
        let first = filter.apply(&c1_batch(5), &mut state, 0);
        assert_eq!(first.records.len(), 1);
        assert_eq!(state.last_notified(&c1_key()), Some(0));

        // Tick 2, five minutes later.
        let second = filter.apply(&c1_batch(5), &mut state, 300_000);
        assert!(second.records.is_empty());
        assert_eq!(second.classification, Classification::NoNewSlots);
        assert_eq!(state.last_notified(&c1_key()), Some(0));

        // Tick 3, ~11.67 minutes after the first.
        let third = filter.apply(&c1_batch(5), &mut state, 700_000);
        assert_eq!(third.records.len(), 1);
        assert_eq!(state.last_notified(&c1_key()), Some(700_000));
    }

    // -- key composition ---------------------------------------------------

    #[test]
    fn distinct_age_bands_and_dates_are_separate_topics() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        let centers = vec![make_center(
            1,
            vec![
                make_session(18, "10-5-2021", 5),
                make_session(45, "10-5-2021", 5),
                make_session(18, "11-5-2021", 5),
            ],
        )];

        let outcome = filter.apply(&centers, &mut state, 0);
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn same_topic_twice_in_one_batch_emits_once() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        let centers = vec![make_center(
            1,
            vec![make_session(18, "10-5-2021", 5), make_session(18, "10-5-2021", 7)],
        )];

        let outcome = filter.apply(&centers, &mut state, 0);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].availability, 5);
    }

    #[test]
    fn output_preserves_input_order() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        let centers = vec![
            make_center(7, vec![make_session(45, "12-5-2021", 1)]),
            make_center(
                3,
                vec![make_session(18, "10-5-2021", 0), make_session(18, "11-5-2021", 2)],
            ),
        ];

        let outcome = filter.apply(&centers, &mut state, 0);
        let ids: Vec<(u64, &str)> = outcome
            .records
            .iter()
            .map(|r| (r.center_id, r.date.as_str()))
            .collect();
        assert_eq!(ids, vec![(7, "12-5-2021"), (3, "11-5-2021")]);
    }

    #[test]
    fn suppressed_topic_does_not_block_new_one() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        filter.apply(&c1_batch(5), &mut state, 0);

        let centers = vec![
            make_center(1, vec![make_session(18, "10-5-2021", 5)]),
            make_center(2, vec![make_session(18, "10-5-2021", 5)]),
        ];
        let outcome = filter.apply(&centers, &mut state, 1_000);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].center_id, 2);
    }

    // -- malformed input ---------------------------------------------------

    #[test]
    fn empty_input_classified_as_no_centers() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();

        let outcome = filter.apply(&[], &mut state, 0);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.classification, Classification::NoCenters);
    }

    #[test]
    fn malformed_payloads_produce_no_records() {
        let filter = NotificationFilter::new();
        let payloads = [
            json!({}),
            json!({ "centers": null }),
            json!({ "centers": "oops" }),
            json!({ "centers": [] }),
            json!({ "error": "Invalid district" }),
        ];

        for payload in payloads {
            let mut state = FilterState::new();
            let resp: AvailabilityResponse = serde_json::from_value(payload.clone()).unwrap();
            let outcome = filter.apply(&resp.centers, &mut state, 0);
            assert!(outcome.records.is_empty(), "payload {payload}");
            assert_eq!(outcome.classification, Classification::NoCenters);
        }
    }

    #[test]
    fn centers_without_sessions_are_not_an_error() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        let resp: AvailabilityResponse = serde_json::from_value(json!({
            "centers": [
                { "center_id": 1, "name": "A" },
                { "center_id": 2, "name": "B", "sessions": {} }
            ]
        }))
        .unwrap();

        let outcome = filter.apply(&resp.centers, &mut state, 0);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.classification, Classification::NoNewSlots);
    }

    // -- pruning -----------------------------------------------------------

    #[test]
    fn prune_only_drops_expired_entries() {
        let filter = NotificationFilter::new();
        let mut state = FilterState::new();
        filter.apply(&c1_batch(5), &mut state, 0);
        let later = vec![make_center(2, vec![make_session(18, "10-5-2021", 5)])];
        filter.apply(&later, &mut state, 500_000);

        assert_eq!(state.prune_expired(COOLDOWN_MS, COOLDOWN_MS), 0);
        assert_eq!(state.prune_expired(COOLDOWN_MS + 1, COOLDOWN_MS), 1);
        assert_eq!(state.len(), 1);
        assert!(state.last_notified(&c1_key()).is_none());
    }

    #[test]
    fn pruning_does_not_change_decisions() {
        let filter = NotificationFilter::new();
        let mut pruned = FilterState::new();
        let mut kept = FilterState::new();

        for now in [0, 300_000, 650_000, 700_000, 1_300_001, 1_400_000] {
            let a = filter.apply(&c1_batch(5), &mut pruned, now);
            pruned.prune_expired(now, COOLDOWN_MS);
            let b = filter.apply(&c1_batch(5), &mut kept, now);
            assert_eq!(a.records, b.records, "diverged at {now}");
        }
    }
}
