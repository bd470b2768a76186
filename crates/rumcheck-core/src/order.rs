//! Canonical time ordering of session events.

use crate::event::TimedEvent;

/// Sorts events by ascending `date`.
///
/// The sort is stable: events sharing a timestamp keep their input order, so
/// ordering an already ordered sequence leaves it untouched.
pub fn order_by_time<E: TimedEvent>(mut events: Vec<E>) -> Vec<E> {
    events.sort_by_key(E::date);
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Tick {
        date: u64,
        label: &'static str,
    }

    impl TimedEvent for Tick {
        fn date(&self) -> u64 {
            self.date
        }
    }

    fn tick(date: u64, label: &'static str) -> Tick {
        Tick { date, label }
    }

    #[test]
    fn orders_by_ascending_date() {
        let ordered = order_by_time(vec![tick(300, "c"), tick(100, "a"), tick(200, "b")]);
        let labels: Vec<_> = ordered.iter().map(|t| t.label).collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let ordered = order_by_time(vec![
            tick(100, "first"),
            tick(50, "early"),
            tick(100, "second"),
            tick(100, "third"),
        ]);
        let labels: Vec<_> = ordered.iter().map(|t| t.label).collect();
        assert_eq!(labels, ["early", "first", "second", "third"]);
    }

    #[test]
    fn reordering_is_a_no_op() {
        let once = order_by_time(vec![tick(2, "b"), tick(1, "a"), tick(2, "c")]);
        let twice = order_by_time(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input() {
        assert!(order_by_time(Vec::<Tick>::new()).is_empty());
    }
}
