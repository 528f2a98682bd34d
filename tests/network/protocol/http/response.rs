use core::task::Poll;

use pollhttp::network::application::http::{
    Options, Outcome, ResponseBody, ResponseReader, read_response_body,
};
use pollhttp::network::error::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::network::{Flood, MockClock, MockConnection, TickingClock, VirtualTime};

fn read<const N: usize>(conn: &mut MockConnection, time: &VirtualTime) -> ResponseBody<N> {
    read_with(conn, time, &Options::default())
}

fn read_with<const N: usize>(
    conn: &mut MockConnection,
    time: &VirtualTime,
    options: &Options,
) -> ResponseBody<N> {
    let mut clock = MockClock::new(time);
    read_response_body(conn, &mut clock, options)
}

#[test]
fn test_content_length_body() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\n")
        .send_at(0, b"Content-Length: 5\n")
        .send_at(0, b"\n")
        .send_at(0, b"Hello");

    let response = read::<64>(&mut conn, &time);

    assert_eq!(response.as_str(), Some("Hello"));
    assert!(response.is_success());
    assert_eq!(response.outcome, Outcome::Complete);
    assert_eq!(response.content_length, Some(5));
}

#[test]
fn test_no_length_closed_without_body() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\nServer: test\r\n\r\n")
        .close_at(0);

    let response = read::<64>(&mut conn, &time);

    assert!(response.as_bytes().is_empty());
    assert!(!response.is_success());
    assert_eq!(response.outcome, Outcome::Empty);
    assert_eq!(response.content_length, None);
}

#[test]
fn test_no_response_at_all() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time);

    let response = read::<64>(&mut conn, &time);

    assert!(response.as_bytes().is_empty());
    assert_eq!(response.outcome, Outcome::NoResponse);
    assert_eq!(response.into_result(), Err(Error::NoResponse));
    // Only the status line phase ran.
    assert_eq!(time.now(), 500);
}

#[test]
fn test_truncated_body_keeps_partial_data() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n")
        .send_at(5, b"abcd");

    let response = read::<64>(&mut conn, &time);

    assert_eq!(response.as_bytes(), b"abcd");
    assert_eq!(
        response.outcome,
        Outcome::Truncated {
            declared: 10,
            received: 4
        }
    );
    assert!(!response.is_success());
    // The body window opens one poll interval after the header line.
    assert_eq!(time.now(), 501);
}

#[test]
fn test_truncated_when_peer_closes_early() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\nContent-Length: 8\r\n\r\nabc")
        .close_at(1);

    let response = read::<64>(&mut conn, &time);

    assert_eq!(response.as_bytes(), b"abc");
    assert_eq!(response.into_result(), Err(Error::Truncated));
}

#[test]
fn test_body_until_close() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\n")
        .send_at(10, b"142\n")
        .send_at(40, b"steady\n")
        .send_at(90, b"2024-05-01 12:00:00")
        .close_at(120);

    let response = read::<64>(&mut conn, &time);

    assert!(response.is_success());
    assert_eq!(response.as_str(), Some("142\nsteady\n2024-05-01 12:00:00"));
    assert_eq!(time.now(), 120);
}

#[test]
fn test_body_until_close_stops_at_deadline() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\n\r\n")
        .send_at(100, b"first")
        .send_at(900, b"late");

    let response = read::<64>(&mut conn, &time);

    // Data was received, so the read counts as complete even though the peer
    // never closed.
    assert_eq!(response.as_str(), Some("first"));
    assert!(response.is_success());
    assert_eq!(time.now(), 500);
}

#[test]
fn test_header_name_is_case_insensitive() {
    for header in [
        "Content-Length: 3\r\n",
        "CONTENT-LENGTH: 3\r\n",
        "content-length: 3\r\n",
    ] {
        let time = VirtualTime::new();
        let mut conn = MockConnection::new(&time)
            .send_at(0, b"HTTP/1.1 200 OK\r\n")
            .send_at(0, header.as_bytes())
            .send_at(0, b"\r\nabcdef");

        let response = read::<64>(&mut conn, &time);

        assert_eq!(response.content_length, Some(3), "{header}");
        assert_eq!(response.as_bytes(), b"abc", "{header}");
        assert_eq!(conn.unread(), b"def", "{header}");
    }
}

#[test]
fn test_last_parsed_content_length_wins() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time).send_at(
        0,
        b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nContent-Length: 5\r\n\r\nHello",
    );

    let response = read::<64>(&mut conn, &time);

    assert_eq!(response.content_length, Some(5));
    assert_eq!(response.as_str(), Some("Hello"));
}

#[test]
fn test_unparsable_content_length_is_ignored() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(
            0,
            b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\nContent-Length: lots\r\n\r\nbody",
        )
        .close_at(1);

    let response = read::<64>(&mut conn, &time);
    assert_eq!(response.content_length, Some(4));
    assert_eq!(response.as_str(), Some("body"));

    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\nContent-Length: -1\r\n\r\nstream")
        .close_at(1);

    let response = read::<64>(&mut conn, &time);
    assert_eq!(response.content_length, None);
    assert_eq!(response.as_str(), Some("stream"));
    assert!(response.is_success());
}

#[test]
fn test_zero_content_length() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n")
        .send_at(0, b"HTTP/1.1");

    let response = read::<64>(&mut conn, &time);

    assert!(response.is_success());
    assert!(response.as_bytes().is_empty());
    assert_eq!(conn.unread(), b"HTTP/1.1");
}

#[test]
fn test_header_deadline_checked_between_lines() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\n")
        .send_at(100, b"X-A: 1\n")
        .send_at(200, b"Content-Length: 2\n")
        .send_at(300, b"X-B: 1\n")
        .send_at(400, b"Content-Length: 9\n");
    let options = Options {
        header_timeout_ms: 250,
        ..Options::default()
    };

    let response = read_with::<64>(&mut conn, &time, &options);

    // The header scan stopped after the line that crossed its deadline, so
    // the fourth header line is taken as body.
    assert_eq!(response.content_length, Some(2));
    assert_eq!(response.as_str(), Some("Co"));
    assert!(response.is_success());
    assert_eq!(time.now(), 400);
}

#[test]
fn test_each_header_line_gets_full_timeout() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\n")
        .send_at(0, b"X-Slow: ")
        .send_at(280, b"1\nContent-Length: 1\n\nZ");
    let options = Options {
        line_timeout_ms: 300,
        header_timeout_ms: 100,
        ..Options::default()
    };

    let response = read_with::<64>(&mut conn, &time, &options);

    // The slow line was started inside the header window and allowed to
    // finish past it; no further header line was started afterwards.
    assert_eq!(response.content_length, None);
    assert_eq!(response.as_str(), Some("Content-Length: 1\n\nZ"));
}

#[test]
fn test_stalled_headers_fall_through_to_body() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n")
        .send_at(700, b"ok");

    let response = read::<64>(&mut conn, &time);

    // The empty header read at t=501 ends the header scan without error.
    assert_eq!(response.as_str(), Some("ok"));
    assert!(response.is_success());
    assert_eq!(time.now(), 700);
}

#[test]
fn test_partial_status_line_still_proceeds() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 2")
        .close_at(10);

    let response = read::<64>(&mut conn, &time);

    assert_eq!(response.outcome, Outcome::Empty);
}

#[test]
fn test_declared_length_beyond_capacity_overflows() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n0123456789");

    let response = read::<4>(&mut conn, &time);

    assert_eq!(response.outcome, Outcome::Overflow { capacity: 4 });
    assert_eq!(response.as_bytes(), b"0123");
    assert_eq!(response.into_result(), Err(Error::BufferFull));
}

#[test]
fn test_unframed_body_beyond_capacity_overflows() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\n\r\n")
        .send_at(3, b"abcdefgh")
        .close_at(10);

    let response = read::<6>(&mut conn, &time);

    assert_eq!(response.outcome, Outcome::Overflow { capacity: 6 });
    assert_eq!(response.as_bytes(), b"abcdef");
}

#[test]
fn test_reader_can_be_stepped_manually() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time)
        .send_at(0, b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\nab")
        .send_at(20, b"cd");
    let mut reader = ResponseReader::<64, 16>::new(Options::default(), 0);

    assert_eq!(reader.poll(&mut conn, 0), Poll::Pending);
    assert_eq!(reader.poll(&mut conn, 10), Poll::Pending);

    time.advance(20);
    let Poll::Ready(response) = reader.poll(&mut conn, 20) else {
        panic!("body should be complete");
    };
    assert_eq!(response.as_bytes(), b"abcd");

    // A finished reader keeps reporting its outcome.
    let Poll::Ready(again) = reader.poll(&mut conn, 30) else {
        panic!("finished reader should stay ready");
    };
    assert_eq!(again.outcome, Outcome::Complete);
    assert!(again.as_bytes().is_empty());
}

#[test]
fn test_poll_interval_controls_yield_size() {
    let time = VirtualTime::new();
    let mut conn = MockConnection::new(&time);
    let mut clock = MockClock::new(&time);
    let options = Options {
        poll_interval_ms: 10,
        ..Options::uniform(100)
    };

    let response: ResponseBody<16> = read_response_body(&mut conn, &mut clock, &options);

    assert_eq!(response.outcome, Outcome::NoResponse);
    assert_eq!(clock.delays, 10);
}

#[test]
fn test_randomized_arrivals() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let body: Vec<u8> = (0..rng.gen_range(1..200)).map(|_| rng.r#gen()).collect();
        let declare_length = rng.gen_bool(0.5);

        let time = VirtualTime::new();
        let head = if declare_length {
            format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len())
        } else {
            "HTTP/1.1 200 OK\r\n\r\n".to_string()
        };
        let mut conn = MockConnection::new(&time).send_at(0, head.as_bytes());

        let mut at = 0;
        let mut rest = &body[..];
        while !rest.is_empty() {
            let split = rng.gen_range(1..=rest.len());
            at += rng.gen_range(0..20);
            conn = conn.send_at(at, &rest[..split]);
            rest = &rest[split..];
        }
        if !declare_length {
            conn = conn.close_at(at + 1);
        }

        let response = read::<256>(&mut conn, &time);

        assert!(response.is_success());
        assert_eq!(response.as_bytes(), &body[..]);
    }
}

#[test]
fn test_endless_headers_stop_at_header_deadline() {
    let time = VirtualTime::new();
    let mut conn = Flood::new(b"HTTP/1.1 200 OK\r\n", b"X-Pad: 1\r\n");
    let mut clock = TickingClock::new(&time);

    let response: ResponseBody<64> =
        read_response_body(&mut conn, &mut clock, &Options::uniform(50));

    // Headers never end, so the scan gives up at its deadline and the rest of
    // the stream is taken as an unframed body until the buffer fills.
    assert_eq!(response.content_length, None);
    assert_eq!(response.outcome, Outcome::Overflow { capacity: 64 });
    assert!(response.as_bytes().starts_with(b"X-Pad: 1\r\n"));
    assert!((50..200).contains(&time.now()), "returned at {}", time.now());
}

#[test]
fn test_endless_headers_keep_declared_length() {
    let time = VirtualTime::new();
    let mut conn = Flood::new(b"HTTP/1.1 200 OK\r\n", b"Content-Length: 3\r\n");
    let mut clock = TickingClock::new(&time);

    let response: ResponseBody<64> =
        read_response_body(&mut conn, &mut clock, &Options::uniform(50));

    assert_eq!(response.content_length, Some(3));
    assert_eq!(response.as_str(), Some("Con"));
    assert!(response.is_success());
    assert!(time.now() < 200, "returned at {}", time.now());
}

#[cfg(feature = "async")]
mod async_tests {
    use super::*;
    use futures::executor::block_on;
    use pollhttp::network::application::http::read_response_body_async;

    #[test]
    fn test_async_content_length_body() {
        let time = VirtualTime::new();
        let mut conn = MockConnection::new(&time)
            .send_at(0, b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\n")
            .send_at(15, b"Hello");
        let mut clock = MockClock::new(&time);

        let response: ResponseBody<32> =
            block_on(read_response_body_async(&mut conn, &mut clock, &Options::default()));

        assert_eq!(response.as_str(), Some("Hello"));
        assert!(response.is_success());
        assert_eq!(time.now(), 15);
    }

    #[test]
    fn test_async_no_response() {
        let time = VirtualTime::new();
        let mut conn = MockConnection::new(&time);
        let mut clock = MockClock::new(&time);

        let response: ResponseBody<32> =
            block_on(read_response_body_async(&mut conn, &mut clock, &Options::uniform(40)));

        assert_eq!(response.outcome, Outcome::NoResponse);
        assert_eq!(time.now(), 40);
    }
}
