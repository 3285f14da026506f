use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use yarche_core::Region;

const HUMAN_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";
const FILE_TIMESTAMP: &str = "%Y-%m-%d_%H-%M-%S";

/// `categories (<tt_id>) - <%Y-%m-%d %H:%M:%S>.csv`
#[must_use]
pub fn categories_csv_name(tt_id: &str, created: NaiveDateTime) -> String {
    format!("categories ({tt_id}) - {}.csv", created.format(HUMAN_TIMESTAMP))
}

/// `yarche_app_<region>_<tt_id>_<part>_pd_all_<%Y-%m-%d_%H-%M-%S>.csv`
#[must_use]
pub fn products_csv_name(
    region: Region,
    tt_id: &str,
    part_number: &str,
    created: NaiveDateTime,
) -> String {
    format!(
        "yarche_app_{}_{tt_id}_{part_number}_pd_all_{}.csv",
        region.code,
        created.format(FILE_TIMESTAMP)
    )
}

/// The archive next to `csv_path`, with the same stem and a `.zip` extension.
#[must_use]
pub fn archive_name_for(csv_path: &Path) -> PathBuf {
    csv_path.with_extension("zip")
}

/// Subject line of the archive delivery mail.
#[must_use]
pub fn mail_subject(chain_name: &str, region: Region, tt_id: &str, sent: NaiveDateTime) -> String {
    format!(
        "{chain_name} | app | {} | {tt_id} | pd_all | {}",
        region.name,
        sent.format(HUMAN_TIMESTAMP)
    )
}
