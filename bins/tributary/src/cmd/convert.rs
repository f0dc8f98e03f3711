use std::io::Write;

use tributary_protocol::Converter;

use crate::config::{BatchFile, ConvertArgs, load_converter_config};
use crate::error::CliError;

pub fn run(args: ConvertArgs) -> Result<(), CliError> {
    let config = load_converter_config(args.config.as_deref())?;
    let converter = Converter::from_config(&config)?;

    let group_events = BatchFile::load(&args.input)?.into_group_events();
    tracing::info!(
        input = %args.input.display(),
        events = group_events.events.len(),
        "loaded batch"
    );

    let output = converter.to_byte_stream_with_selected_fields(&group_events, &args.fields)?;
    if output.is_empty() {
        tracing::info!("empty batch, nothing to write");
        return Ok(());
    }

    let stream = &output.streams[0];
    match &args.output {
        Some(path) => std::fs::write(path, stream)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(stream)?;
            stdout.flush()?;
        }
    }
    tracing::info!(bytes = stream.len(), "stream written");

    if let Some(values) = output.values.first().and_then(Option::as_ref) {
        let mut fields: Vec<_> = values.iter().collect();
        fields.sort();
        for (name, value) in fields {
            tracing::info!(field = %name, value = %value, "resolved field");
        }
    }
    Ok(())
}
