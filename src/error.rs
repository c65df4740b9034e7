use custom_error::custom_error;

pub type Result<T> = std::result::Result<T, Error>;

custom_error! {pub Error
    Io{source: std::io::Error} = "I/O error",
    MalformedRecord{line: String} = "malformed record: {line}",
    UnsupportedIcao{icao: String} = "airport code {icao} is not 3 or 4 characters, skipping",
    AirportNotFound{icao: String} = "no airport record matches {icao}",
    IncompleteLayout{icao: String} = "layout records for {icao} do not fill the default template",
    DegenerateGeometry{icao: String} = "projection produced a non-finite coordinate for {icao}"
}
