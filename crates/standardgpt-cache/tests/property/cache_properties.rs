use std::time::Duration;

use proptest::prelude::*;
use standardgpt_cache::{cache_key, TtlTable};
use tokio::time::Instant;

proptest! {
    #[test]
    fn key_is_deterministic(kind in "[a-z_]{1,20}", payload in ".{0,200}") {
        prop_assert_eq!(cache_key(&kind, &payload), cache_key(&kind, &payload));
    }

    #[test]
    fn key_ignores_whitespace_layout(words in proptest::collection::vec("[a-zæøå0-9]{1,8}", 1..10)) {
        let tight = words.join(" ");
        let loose = format!("  {}\n", words.join("   \t"));
        prop_assert_eq!(cache_key("answer", &tight), cache_key("answer", &loose));
    }

    #[test]
    fn table_never_exceeds_cap(cap in 1usize..20, keys in proptest::collection::vec(0u8..50, 0..100)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        rt.block_on(async {
            let mut table = TtlTable::new(cap, Duration::from_secs(3600));
            let now = Instant::now();
            for k in &keys {
                table.insert(k.to_string(), *k, Duration::from_secs(60), now);
                assert!(table.len() <= cap);
            }
        });
    }
}
