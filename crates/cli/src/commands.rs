use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Copy every configured table from source to destination
    Migrate {
        #[arg(long, help = "Config file path (JSON)")]
        config: String,

        #[arg(long, help = "Copy at most one batch per table, then stop")]
        once: bool,

        #[arg(
            long,
            help = "Load KEY=VALUE pairs from this file for ${VAR} expansion"
        )]
        env_file: Option<String>,

        #[arg(long, help = "Directory for replay files, overrides the config")]
        output_dir: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the JSON run summary to this file"
        )]
        report: Option<String>,
    },
    /// Test a connection string against a given format
    TestConn {
        /// Data format: "mssql" or "pg"
        #[arg(long)]
        format: String,

        /// Connection string
        #[arg(long)]
        conn_str: String,
    },
    /// Print the replay statement generated for one row
    Render {
        #[arg(long, help = "Table name used in the statement")]
        table: String,

        #[arg(long, help = "Row as a JSON object, keys in column order")]
        row: String,
    },
}
