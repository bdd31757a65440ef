use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use typed_quantities::{
    constituent, AbsVector, AbsoluteTemperature, AbsoluteTemperatureUnit, Duration, DurationUnit,
    Length, LengthUnit, Position, PositionUnit, RelMatrix, RelVector, SpeedUnit, StorageType,
    Temperature, TemperatureUnit, Unit, ValueError,
};

/// Typed-quantities showcase with configurable vector parameters
#[derive(Parser, Debug)]
#[command(name = "typed-quantities-demo")]
#[command(about = "Unit algebra and container engine demo", long_about = None)]
struct Args {
    /// Vector size in cells
    #[arg(short, long, default_value_t = 2000)]
    size: usize,

    /// Fraction of non-zero cells in the generated vector (0-1)
    #[arg(short, long, default_value_t = 0.05)]
    density: f64,

    /// Storage representation for the generated vector (dense, sparse)
    #[arg(long, default_value = "sparse")]
    storage: String,

    /// Seed for the random generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Dimension of the square demo matrix
    #[arg(short, long, default_value_t = 4)]
    matrix_dim: usize,
}

fn main() -> Result<(), ValueError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    info!(size = args.size, density = args.density, "demo starting");

    let storage = match args.storage.to_lowercase().as_str() {
        "dense" => StorageType::Dense,
        "sparse" => StorageType::Sparse,
        other => {
            println!("Unknown storage '{}', using sparse", other);
            StorageType::Sparse
        }
    };

    println!("=== Typed Quantities Demo ===\n");

    // Compose a unit at runtime instead of hand-deriving its scale factor
    println!("--- Unit composition ---");
    let fur_per_fn = SpeedUnit::compound(
        "fur/fn",
        "furlong per fortnight",
        &[
            constituent(LengthUnit::FURLONG, 1),
            constituent(DurationUnit::FORTNIGHT, -1),
        ],
    )?;
    println!(
        "composed '{}' with scale factor {:.6e} m/s",
        fur_per_fn.name(),
        fur_per_fn.scale().factor()
    );

    let track = Length::new(1000.0, LengthUnit::FURLONG);
    let window = Duration::new(2.0, DurationUnit::FORTNIGHT);
    let pace = track / window;
    println!(
        "{:.1} fur / {:.1} fn = {:.5} m/s = {:.5} km/h = {:.1} fur/fn",
        track.in_unit(),
        window.in_unit(),
        pace.si(),
        pace.in_unit_of(SpeedUnit::KM_PER_HOUR),
        pace.in_unit_of(fur_per_fn)
    );

    let mach = SpeedUnit::derive_linear(SpeedUnit::METER_PER_SECOND, 343.0, "Ma", "mach");
    println!(
        "derived '{}': 1.0 Ma = {:.1} km/h\n",
        mach.name(),
        SpeedUnit::KM_PER_HOUR.from_standard(mach.to_standard(1.0))
    );

    // Absolute quantities carry an origin; their differences are relative
    println!("--- Absolute vs relative ---");
    let here = Position::new(10.0, PositionUnit::METER);
    let there = Position::new(3.0, PositionUnit::METER);
    println!("{here} - {there} = {}", here - there);

    let noon = AbsoluteTemperature::new(25.0, AbsoluteTemperatureUnit::DEGREE_CELSIUS);
    let heating = Temperature::new(10.0, TemperatureUnit::DEGREE_CELSIUS);
    println!(
        "{noon} ({:.2} K absolute) + {heating} = {}\n",
        noon.si(),
        noon + heating
    );

    // Container engine: representation, promotion, copy-on-write
    println!("--- Vectors ({} cells, {} storage) ---", args.size, storage);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let raw: Vec<f64> = (0..args.size)
        .map(|_| {
            if rng.random::<f64>() < args.density {
                rng.random_range(1.0..100.0)
            } else {
                0.0
            }
        })
        .collect();
    let speeds = RelVector::new(&raw, SpeedUnit::KM_PER_HOUR, storage)?;
    println!(
        "generated: {} of {} cells non-zero, total {:.1} km/h",
        speeds.cardinality(),
        speeds.size(),
        speeds.zsum().in_unit()
    );

    let ones = RelVector::new(&vec![1.0; args.size], SpeedUnit::KM_PER_HOUR, StorageType::Dense)?;
    let lifted = speeds.plus(&ones)?;
    println!(
        "{} + {} = {} (storage promotion)",
        speeds.storage_type(),
        ones.storage_type(),
        lifted.storage_type()
    );

    let mut weights = lifted.mutable();
    weights.normalize()?;
    println!("normalized copy sums to {:.6}", weights.zsum().si());

    let mut edited = speeds.mutable();
    edited.set_in_unit(0, 99.9)?;
    println!(
        "copy-on-write: source cell 0 still {:.1} km/h, edited handle reads {:.1} km/h\n",
        speeds.get_in_unit(0)?,
        edited.get_in_unit(0)?
    );

    // Typed matrices share the engine; determinant works on the SI data
    println!("--- Matrix ---");
    let rows: Vec<Vec<f64>> = (0..args.matrix_dim)
        .map(|_| {
            (0..args.matrix_dim)
                .map(|_| rng.random_range(-10.0..10.0))
                .collect()
        })
        .collect();
    let field = RelMatrix::new(&rows, LengthUnit::METER, StorageType::Dense)?;
    if args.matrix_dim <= 4 {
        println!("{}", field.to_text(LengthUnit::METER, true, true));
    }
    println!(
        "determinant of the {}x{} length matrix: {:.3}",
        field.rows(),
        field.cols(),
        field.determinant()?
    );

    let origins = AbsVector::new(&[0.0, 100.0, 250.0], PositionUnit::METER, StorageType::Dense)?;
    let stations = AbsVector::new(&[40.0, 180.0, 400.0], PositionUnit::METER, StorageType::Dense)?;
    let legs = stations.minus_abs(&origins)?;
    println!(
        "station spacing: {} (relative {})",
        legs,
        legs.unit().name()
    );

    Ok(())
}
