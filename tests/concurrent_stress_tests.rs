//! Concurrent stress tests for the byte channel
//! Tests focused on blocking hand-off, wakeup ordering, interruption, and
//! sustained producer/consumer streaming over both backends.

use std::{
    sync::{Arc, Barrier},
    thread,
    time::Duration,
};

use seine::{ByteChannel, ChannelConfig, SeineError, TransferMode};

#[cfg(test)]
mod concurrent_stress_tests {
    use super::*;

    fn stream_through(channel: Arc<ByteChannel>, total: usize) {
        let payload: Vec<u8> = (0..total).map(|i| (i % 251) as u8).collect();
        let expected = payload.clone();
        let barrier = Arc::new(Barrier::new(2));

        let producer_channel = channel.clone();
        let producer_barrier = barrier.clone();
        let producer = thread::spawn(move || {
            producer_barrier.wait();
            let mut sent = 0;
            while sent < payload.len() {
                // Uneven chunk sizes exercise short writes and wrapping.
                let chunk_len = (payload.len() - sent).min(1 + (sent * 13) % 97);
                sent += producer_channel
                    .write(&payload[sent..sent + chunk_len], TransferMode::Blocking)
                    .unwrap();
            }
        });

        let consumer_channel = channel.clone();
        let consumer_barrier = barrier.clone();
        let consumer = thread::spawn(move || {
            consumer_barrier.wait();
            let mut collected = Vec::with_capacity(total);
            let mut buf = [0u8; 61];
            while collected.len() < total {
                let n = consumer_channel
                    .read(&mut buf, TransferMode::Blocking)
                    .unwrap();
                collected.extend_from_slice(&buf[..n]);
            }
            collected
        });

        producer.join().unwrap();
        let collected = consumer.join().unwrap();

        assert_eq!(collected, expected);
        assert!(channel.is_empty());
        assert_eq!(channel.stats().bytes_written, total as u64);
        assert_eq!(channel.stats().bytes_read, total as u64);
    }

    /// Test: sustained streaming through a small ring forces both roles
    /// to block and preserves byte order end to end
    #[test]
    fn stress_spsc_streaming_ring() {
        let channel = Arc::new(ByteChannel::new(ChannelConfig::ring(64)).unwrap());
        stream_through(channel, 100_000);
    }

    /// Test: the scatter-gather backend streams identically and reclaims
    /// its chain whenever the consumer fully catches up
    #[test]
    fn stress_spsc_streaming_scatter() {
        let channel = Arc::new(
            ByteChannel::new(ChannelConfig::scatter_gather(64, 16, 2)).unwrap(),
        );
        stream_through(channel.clone(), 50_000);

        // Force one more drain check so the final chain is released.
        let mut buf = [0u8; 1];
        let _ = channel.read(&mut buf, TransferMode::NonBlocking);
        assert_eq!(channel.storage_stats().allocated_groups, 0);
        assert!(channel.stats().trims > 0);
    }

    /// Test: a reader blocked on an empty channel is woken by a write
    #[test]
    fn blocked_reader_woken_by_write() {
        let channel = Arc::new(ByteChannel::new(ChannelConfig::ring(16)).unwrap());

        let reader_channel = channel.clone();
        let reader = thread::spawn(move || {
            let mut out = [0u8; 4];
            let n = reader_channel
                .read(&mut out, TransferMode::Blocking)
                .unwrap();
            out[..n].to_vec()
        });

        while channel.stats().consumer_waits == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        channel.write(b"wake", TransferMode::Blocking).unwrap();

        assert_eq!(reader.join().unwrap(), b"wake");
    }

    /// Test: a writer blocked on a full channel is woken by a read
    #[test]
    fn blocked_writer_woken_by_read() {
        let channel = Arc::new(ByteChannel::new(ChannelConfig::ring(4)).unwrap());
        channel.write(b"full", TransferMode::Blocking).unwrap();

        let writer_channel = channel.clone();
        let writer = thread::spawn(move || {
            writer_channel.write(b"more", TransferMode::Blocking).unwrap()
        });

        while channel.stats().producer_waits == 0 {
            thread::sleep(Duration::from_millis(1));
        }

        let mut out = [0u8; 4];
        assert_eq!(channel.read(&mut out, TransferMode::Blocking).unwrap(), 4);
        assert_eq!(&out, b"full");

        assert_eq!(writer.join().unwrap(), 4);
        assert_eq!(channel.read(&mut out, TransferMode::Blocking).unwrap(), 4);
        assert_eq!(&out, b"more");
    }

    /// Test: an interrupted reader retries the same call and loses nothing
    #[test]
    fn interrupted_reader_retries_successfully() {
        let channel = Arc::new(ByteChannel::new(ChannelConfig::ring(16)).unwrap());
        let interrupter = channel.interrupter();

        let reader_channel = channel.clone();
        let reader = thread::spawn(move || {
            let mut out = [0u8; 8];
            loop {
                match reader_channel.read(&mut out, TransferMode::Blocking) {
                    Ok(n) => return out[..n].to_vec(),
                    Err(SeineError::Interrupted) => continue,
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        });

        while channel.stats().consumer_waits == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        interrupter.interrupt();

        while channel.stats().interrupts == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        channel.write(b"after", TransferMode::Blocking).unwrap();

        assert_eq!(reader.join().unwrap(), b"after");
        assert!(channel.stats().interrupts >= 1);
    }

    /// Test: blocking and non-blocking calls mix freely on one channel
    #[test]
    fn mixed_blocking_and_nonblocking_calls() {
        let channel = Arc::new(ByteChannel::new(ChannelConfig::ring(8)).unwrap());

        let consumer_channel = channel.clone();
        let consumer = thread::spawn(move || {
            let mut drained = 0usize;
            let mut buf = [0u8; 3];
            while drained < 24 {
                match consumer_channel.read(&mut buf, TransferMode::NonBlocking) {
                    Ok(n) => drained += n,
                    Err(SeineError::WouldBlock) => thread::sleep(Duration::from_millis(1)),
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            drained
        });

        let mut sent = 0usize;
        while sent < 24 {
            let chunk = &[7u8; 5][..(24 - sent).min(5)];
            match channel.write(chunk, TransferMode::NonBlocking) {
                Ok(n) => sent += n,
                Err(SeineError::WouldBlock) => {
                    sent += channel.write(chunk, TransferMode::Blocking).unwrap();
                }
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(consumer.join().unwrap(), 24);
    }
}
