use std::io;

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;

/// Log writer that clears the progress bar while each line is written and
/// redraws it afterwards, so log lines and the bar don't interleave.
#[derive(Clone)]
pub struct ProgressWriter<M> {
    bar: ProgressBar,
    inner: M,
}

impl<M> ProgressWriter<M> {
    pub fn new(bar: ProgressBar, inner: M) -> Self {
        Self { bar, inner }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for ProgressWriter<M> {
    type Writer = SuspendedWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedWriter {
            bar: self.bar.clone(),
            inner: self.inner.make_writer(),
        }
    }
}

pub struct SuspendedWriter<W> {
    bar: ProgressBar,
    inner: W,
}

impl<W: io::Write> io::Write for SuspendedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
