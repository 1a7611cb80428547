use log::{trace,info,warn,error,LevelFilter};
use std::fs::File;
use std::io::{Write,BufWriter};
use pico_args::Arguments;

use sphrand::{
    common::*,
    math::*,
    config::{Config,Loadable},
    math_random::Random,
    progress::ProgressIndicator,
    spherical::{Direction,Mode,Sphere},
    stats::Report
};

fn main()->Res<()> {
    // Logs go to stderr, stdout carries the points
    simple_logger::SimpleLogger::new()
	.with_level(LevelFilter::Info)
	.env()
	.init()?;

    let res = main0();
    if let Err(e) = &res {
	error!("{}",e);
    }

    res
}

fn configure(mut args:Arguments)->Res<Config> {
    let config_fn : Option<String> = args.opt_value_from_str("--config")?;
    let mut config = match config_fn {
	Some(path) => {
	    info!("Loading configuration from {}",path);
	    Config::load(&path)?
	},
	None => Config::default()
    };

    if let Some(n) = args.opt_value_from_str("--count")? {
	config.samples = n;
    }
    if let Some(seed) = args.opt_value_from_str("--seed")? {
	config.seed = Some(seed);
    }
    if let Some(mode) = args.opt_value_from_str::<_,Mode>("--mode")? {
	config.mode = mode;
    }
    if let Some(direction) = args.opt_value_from_str::<_,Direction>("--direction")? {
	config.direction = direction;
    }
    if let Some(radius) = args.opt_value_from_str("--radius")? {
	config.radius = radius;
    }
    if let Some(output) = args.opt_value_from_str("--output")? {
	config.output = Some(output);
    }
    if args.contains("--check") {
	config.check = true;
    }

    let rest = args.finish();
    if !rest.is_empty() {
	warn!("Ignoring arguments {:?}",rest);
    }
    Ok(config)
}

/// Writes one `x y z` line per point; keeps the points when checking.
fn write_points<W:Write>(fd:&mut W,sphere:&Sphere,rng:&mut Random,config:&Config)
			 ->Res<Option<Array2<Real>>> {
    let n = config.samples;
    let mut points : Option<Array2<Real>> =
	if config.check { Some(Array2::zeros((n,3))) } else { None };
    let mut progress = ProgressIndicator::new("Sampling",n);

    for i in 0..n {
	let p = sphere.sample(rng,config.mode);
	writeln!(fd,"{}",p)?;
	if let Some(a) = points.as_mut() {
	    for k in 0..3 {
		a[[i,k]] = p[k];
	    }
	}
	progress.update(i + 1);
    }
    fd.flush()?;
    Ok(points)
}

fn main0()->Res<()> {
    let config = configure(Arguments::from_env())?;
    trace!("Configuration: {:?}",config);

    let sphere = config.sphere()?;
    let mut rng = match config.seed {
	Some(seed) => {
	    info!("Seeding generator with {}",seed);
	    Random::seeded(seed)
	},
	None => Random::new()
    };

    let n = config.samples;
    info!("Drawing {} points, {:?} of sphere at {:?} radius {} ({:?} directions)",
	  n,config.mode,sphere.center.0,sphere.radius,sphere.direction);

    let mut fd : Box<dyn Write> = match &config.output {
	Some(path) => {
	    info!("Writing points to {}",path);
	    Box::new(BufWriter::new(File::create(path)?))
	},
	None => Box::new(BufWriter::new(std::io::stdout().lock()))
    };

    let points = write_points(&mut fd,&sphere,&mut rng,&config)?;

    if let Some(a) = &points {
	info!("Checking distribution");
	let report = Report::compute(a.view(),&sphere,config.mode)?;
	info!("{}",report);
	report.verify(config.tolerance)?;
	info!("Distribution within tolerance {}",config.tolerance);
    }

    Ok(())
}
