//! Resource command - resolve resource locations

use crate::cli::args::ResourceArgs;
use crate::error::{StrataError, StrataResult};
use crate::loader::UnitLoader;
use std::io::Write;

/// Execute the resource command
pub async fn execute(args: ResourceArgs, loader: &UnitLoader) -> StrataResult<()> {
    if args.all {
        let urls = loader.find_all_resources(&args.name);
        if urls.is_empty() {
            return Err(not_found(&args.name));
        }
        for url in urls {
            println!("{}", url);
        }
        return Ok(());
    }

    if args.cat {
        let mut stream = loader
            .open_resource_stream(&args.name)?
            .ok_or_else(|| not_found(&args.name))?;
        let mut stdout = std::io::stdout().lock();
        std::io::copy(&mut stream, &mut stdout)
            .map_err(|e| StrataError::io(format!("streaming {}", args.name), e))?;
        stdout
            .flush()
            .map_err(|e| StrataError::io("flushing stdout", e))?;
        return Ok(());
    }

    let url = loader
        .find_resource(&args.name)
        .ok_or_else(|| not_found(&args.name))?;
    println!("{}", url);
    Ok(())
}

fn not_found(name: &str) -> StrataError {
    StrataError::User(format!("Resource not found: {}", name))
}
