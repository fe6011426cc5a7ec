use std::fmt;

use crate::error::Result;
use crate::inventory::{Inventory, Status};
use crate::package::{Category, Package};

const PLATFORM_HEADER: &str =
    "OS               Release      Platform           Local         URL";
const MEDIA_HEADER: &str =
    "Package Name                                     Local         URL";

/// The `--list` output: test, verifier and media tables in that order.
pub fn render(packages: &[Package], inventory: &Inventory) -> Result<String> {
    let rows = packages
        .iter()
        .map(|p| Ok((p, inventory.status(p)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Report { rows }.to_string())
}

struct Report<'a> {
    rows: Vec<(&'a Package, Status)>,
}

impl Report<'_> {
    fn platform_table(&self, f: &mut fmt::Formatter<'_>, title: &str, category: Category) -> fmt::Result {
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", PLATFORM_HEADER)?;
        for (p, status) in self.rows.iter().filter(|(p, _)| p.category == category) {
            let os = format!("Android {}", p.android_version.as_deref().unwrap_or("None"));
            writeln!(
                f,
                "{:<16} {:<12} {:<18} {:<13} {}",
                os,
                p.release.as_deref().unwrap_or("None"),
                p.platform.as_deref().unwrap_or("None"),
                status,
                p.url
            )?;
        }
        Ok(())
    }

    fn media_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Media packages]")?;
        writeln!(f, "{}", MEDIA_HEADER)?;
        for (p, status) in self.rows.iter().filter(|(p, _)| p.category == Category::Media) {
            writeln!(f, "{:<48} {:<13} {}", p.filename, status, p.url)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.platform_table(f, "[CTS packages]", Category::Test)?;
        f.write_str("\n\n")?;
        self.platform_table(f, "[CTS Verifier packages]", Category::Verifier)?;
        f.write_str("\n\n")?;
        self.media_table(f)
    }
}
