//! Lock-free ring buffer carrying samples between threads
//!
//! The producer half lives with whoever generates filtered audio; the
//! consumer half moves into the device callback.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Heap-allocated sample ring buffer, split into producer and consumer
/// halves before use.
pub struct SampleRingBuffer {
    producer: HeapProducer<f64>,
    consumer: HeapConsumer<f64>,
    capacity: usize,
}

impl SampleRingBuffer {
    /// # Arguments
    /// * `capacity` - Buffer capacity in samples
    pub fn with_capacity(capacity: usize) -> Self {
        let (producer, consumer) = HeapRb::<f64>::new(capacity).split();
        Self {
            producer,
            consumer,
            capacity,
        }
    }

    pub fn split(self) -> (SampleProducer, SampleConsumer) {
        (
            SampleProducer {
                producer: self.producer,
            },
            SampleConsumer {
                consumer: self.consumer,
            },
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Writing half of the ring buffer.
pub struct SampleProducer {
    producer: HeapProducer<f64>,
}

impl SampleProducer {
    /// Write samples, returning how many actually fit.
    pub fn write(&mut self, samples: &[f64]) -> usize {
        self.producer.push_slice(samples)
    }

    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }
}

/// Reading half of the ring buffer.
pub struct SampleConsumer {
    consumer: HeapConsumer<f64>,
}

impl SampleConsumer {
    /// Read into `buffer`, returning how many samples were available.
    pub fn read(&mut self, buffer: &mut [f64]) -> usize {
        self.consumer.pop_slice(buffer)
    }

    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }
}
