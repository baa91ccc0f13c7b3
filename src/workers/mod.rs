//! Reader/writer worker drivers used by tests and the demo binary.
//!
//! A [`Reader`] spawns a thread that loops acquire-read, read the
//! resource, release-read, sleep, until [`stop`](Reader::stop) is
//! called. A [`Writer`] does the same with write. Both register
//! themselves with the Gate's round-robin turn ring on entry and
//! unregister on exit, so the ring reflects exactly the set of live
//! workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::gate::Gate;
use crate::resource::{DataGenerator, ResourceBuffer};

/// Spawns a thread that repeatedly reads `resource` through `gate`.
pub struct Reader {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Reader {
    pub fn new(gate: Arc<Gate>, resource: Arc<ResourceBuffer>, poll_interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_loop = stop.clone();
        let handle = thread::spawn(move || {
            gate.register();
            let mut scratch = vec![0u8; 64];
            while !stop_loop.load(Ordering::Relaxed) {
                if gate.read_acquire().is_ok() {
                    let _ = resource.read(&mut scratch, scratch.len());
                    gate.read_release();
                }
                thread::sleep(poll_interval);
            }
            gate.unregister();
        });
        Self { stop, handle: Some(handle) }
    }

    /// A read that doesn't loop: used by probes in the property tests.
    pub fn punctual_read(gate: &Gate, resource: &ResourceBuffer, out: &mut [u8]) -> usize {
        if gate.read_acquire().is_err() {
            return 0;
        }
        let n = resource.read(out, out.len());
        gate.read_release();
        n
    }

    /// Signals the worker thread to exit and joins it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns a thread that repeatedly writes generated bytes into
/// `resource` through `gate`.
pub struct Writer {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Writer {
    pub fn new(
        gate: Arc<Gate>,
        resource: Arc<ResourceBuffer>,
        data_generator: Arc<dyn DataGenerator>,
        poll_interval: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_loop = stop.clone();
        let handle = thread::spawn(move || {
            gate.register();
            while !stop_loop.load(Ordering::Relaxed) {
                if gate.write_acquire().is_ok() {
                    let bytes = data_generator.generate();
                    let _ = resource.write(&bytes, bytes.len());
                    gate.write_release();
                }
                thread::sleep(poll_interval);
            }
            gate.unregister();
        });
        Self { stop, handle: Some(handle) }
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Policy;
    use crate::resource::CharDataGenerator;

    #[test]
    fn reader_and_writer_drive_the_resource() {
        let gate = Arc::new(Gate::new(Policy::Reader));
        let resource = Arc::new(ResourceBuffer::new(4096));
        let generator: Arc<dyn DataGenerator> = Arc::new(CharDataGenerator::new(b'x', 8));

        let mut writer = Writer::new(
            gate.clone(),
            resource.clone(),
            generator,
            Duration::from_millis(1),
        );
        thread::sleep(Duration::from_millis(50));
        writer.stop();

        assert!(resource.size() > 0);
    }
}
