//! Sweep engine: drives the application surface and collects results.
mod collect;
mod deliver;
mod dom;
mod filename;
mod persist;
mod replay;
mod session;
mod settings;
mod surface;
mod types;
mod wait;

pub use collect::collect_term;
pub use deliver::{deliver_report, DeliveredReport, DeliveryError, ReportViewer, SystemViewer};
pub use dom::DomSnapshot;
pub use filename::report_file_stem;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use replay::{ReplayError, ReplayScript, ReplaySearch, ReplaySurface, ReplayTab};
pub use session::{read_account_name, run_session, NullProgressSink, ProgressSink};
pub use settings::{SettingsError, SweepSettings};
pub use surface::{
    CategoryTab, ControlHandle, PagerFingerprint, SearchInput, UiDriver, UiProbe, UiSurface,
};
pub use types::{SweepError, SweepEvent, TermProgress};
pub use wait::{delay, wait_until, WaitError};

pub use tokio_util::sync::CancellationToken;
