use std::{collections::HashSet, time::Duration};

use spotreq::{ConnectionPool, SpotifyError};

#[test]
fn test_session_count_follows_request_limit() {
    for (limit, expected) in [(1, 1), (499, 1), (500, 1), (501, 2), (1000, 2), (1001, 3), (2500, 5)] {
        let mut pool = ConnectionPool::new();
        pool.create(30, limit).unwrap();

        assert_eq!(pool.len(), expected, "request_limit {limit}");
        assert_eq!(ConnectionPool::sessions_for(limit), expected);
        assert_eq!(pool.request_limit(), limit);

        pool.close();
        assert_eq!(pool.len(), 0);
    }
}

#[test]
fn test_create_replaces_existing_sessions() {
    let mut pool = ConnectionPool::new();
    pool.create(30, 2000).unwrap();
    assert_eq!(pool.len(), 4);

    pool.create(10, 500).unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.timeout(), Some(Duration::from_secs(10)));
}

#[test]
fn test_close_is_idempotent() {
    let mut pool = ConnectionPool::new();
    pool.close();
    assert!(pool.is_empty());

    pool.create(30, 500).unwrap();
    pool.close();
    pool.close();
    assert!(pool.is_empty());
    assert_eq!(pool.timeout(), None);
}

#[test]
fn test_acquire_on_empty_pool() {
    let mut pool = ConnectionPool::new();
    assert!(pool.acquire_next().is_none());
}

#[test]
fn test_acquire_is_round_robin() {
    let mut pool = ConnectionPool::new();
    pool.create(30, 2000).unwrap();
    let size = pool.len();

    let order: Vec<usize> = (0..size * 5)
        .map(|_| pool.acquire_next().unwrap().index)
        .collect();

    // every window of `size` consecutive picks touches every session once
    for window in order.windows(size) {
        let distinct: HashSet<usize> = window.iter().copied().collect();
        assert_eq!(distinct.len(), size);
    }

    // and the cycle repeats with period `size`
    for i in size..order.len() {
        assert_eq!(order[i], order[i - size]);
    }
}

#[test]
fn test_rotation_continues_where_it_left_off() {
    let mut pool = ConnectionPool::new();
    pool.create(30, 1500).unwrap();

    let first = pool.acquire_next().unwrap().index;
    let second = pool.acquire_next().unwrap().index;
    let third = pool.acquire_next().unwrap().index;
    let fourth = pool.acquire_next().unwrap().index;

    assert_ne!(first, second);
    assert_ne!(second, third);
    assert_ne!(first, third);
    assert_eq!(fourth, first);
}

#[test]
fn test_burst_touches_ceil_n_over_p_sessions_per_session() {
    let mut pool = ConnectionPool::new();
    pool.create(30, 1500).unwrap();

    let mut hits = [0usize; 3];
    for _ in 0..10 {
        hits[pool.acquire_next().unwrap().index] += 1;
    }

    // 10 picks over 3 sessions: each gets 3 or 4
    assert!(hits.iter().all(|&h| h == 3 || h == 4));
    assert_eq!(hits.iter().sum::<usize>(), 10);
}

#[test]
fn test_zero_timeout_means_unlimited() {
    let mut pool = ConnectionPool::new();
    pool.create(0, 500).unwrap();

    assert_eq!(pool.len(), 1);
    assert_eq!(pool.timeout(), None);
}

#[tokio::test]
async fn test_session_slots_follow_request_limit() {
    let mut pool = ConnectionPool::new();
    pool.create(30, 2).unwrap();
    let session = pool.acquire_next().unwrap();
    assert_eq!(session.available_slots(), 2);

    let first = session.acquire_slot().await.unwrap();
    let _second = session.acquire_slot().await.unwrap();
    assert_eq!(session.available_slots(), 0);

    drop(first);
    assert_eq!(session.available_slots(), 1);
}

#[tokio::test]
async fn test_close_fails_requests_waiting_for_a_slot() {
    let mut pool = ConnectionPool::new();
    pool.create(30, 1).unwrap();
    let session = pool.acquire_next().unwrap();
    let _busy = session.acquire_slot().await.unwrap();

    let waiter = session.clone();
    let pending = tokio::spawn(async move { waiter.acquire_slot().await.map(|_| ()) });
    tokio::time::sleep(Duration::from_millis(20)).await;

    pool.close();
    let result = pending.await.unwrap();
    assert!(matches!(result, Err(SpotifyError::Configuration(_))));
}
