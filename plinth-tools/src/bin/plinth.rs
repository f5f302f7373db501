#![warn(clippy::all)]

use std::{path::PathBuf, time::Instant};

use anyhow::{anyhow, Context, Result};
use clap::{value_t, App, Arg, ArgMatches};
use log::{info, warn};
use plinth_algorithms::{
    cluster_summary::summarize,
    dbscan::{dbscan_with_params, largest_cluster, DbscanParams},
    floor::{remove_floor_with, FilterResult, FloorFilterParams},
};
use plinth_core::{
    index::{AnyIndex, IndexBackend, KdTree, RStarIndex, StrTree},
    math::{Axis, Point},
};
use plinth_io::{
    ascii::write_mask_to_path,
    base::{read_all, write_all, PointFormat},
};

struct Args {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub format: Option<PointFormat>,
    pub backend: IndexBackend,
    pub dbscan: Option<DbscanParams>,
    pub floor: Option<FloorFilterParams>,
    pub write_mask: bool,
    pub summary: Option<usize>,
}

fn parse_value<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| anyhow!("Invalid value '{}' for {}: {}", value, name, e))
        })
        .transpose()
}

fn get_args() -> Result<Args> {
    let default_dbscan = DbscanParams::default();
    let default_floor = FloorFilterParams::default();
    let default_radius = default_dbscan.radius.to_string();
    let default_min_points = default_dbscan.min_points.to_string();
    let default_floor_ratio = default_floor.floor_ratio.to_string();
    let default_search_radius = default_floor.search_radius.to_string();
    let default_mid_start = default_floor.mid_start.to_string();
    let default_mid_end = default_floor.mid_end.to_string();
    let default_min_points_above = default_floor.min_points_above.to_string();
    let default_up_axis = default_floor.up_axis.to_string();
    let default_backend = IndexBackend::default().to_string();

    let matches = App::new("plinth")
        .version("0.1")
        .about("Isolates the scanned object in a vertex cloud: keeps the largest density cluster and removes the floor below it")
        .arg(Arg::with_name("INPUT").short("i").long("input").takes_value(true).value_name("INPUT").help("Input file (.xyz or .obj)").required(true))
        .arg(Arg::with_name("OUTPUT").short("o").long("output").takes_value(true).value_name("OUTPUT").help("Output file").required(true))
        .arg(Arg::with_name("FORMAT").long("format").takes_value(true).possible_values(&["xyz", "obj"]).help("Format of input and output. Inferred from the file extensions if omitted"))
        .arg(Arg::with_name("INDEX").long("index").takes_value(true).possible_values(&["kdtree", "rstar", "str"]).default_value(&default_backend).help("Spatial index used for the neighbourhood queries"))
        .arg(Arg::with_name("RADIUS").long("radius").takes_value(true).default_value(&default_radius).help("DBSCAN neighbourhood radius"))
        .arg(Arg::with_name("MIN_POINTS").long("min-points").takes_value(true).default_value(&default_min_points).help("DBSCAN minimum number of neighbours of a core point, counting itself"))
        .arg(Arg::with_name("SKIP_CLUSTERING").long("skip-clustering").help("Keep all points instead of only the largest cluster"))
        .arg(Arg::with_name("SKIP_FLOOR").long("skip-floor").help("Do not remove the floor"))
        .arg(Arg::with_name("FLOOR_RATIO").long("floor-ratio").takes_value(true).default_value(&default_floor_ratio).help("Height of the floor band as a fraction of the height range"))
        .arg(Arg::with_name("SEARCH_RADIUS").long("search-radius").takes_value(true).default_value(&default_search_radius).help("Horizontal radius of the column check above each floor point"))
        .arg(Arg::with_name("MID_START").long("mid-start").takes_value(true).default_value(&default_mid_start).help("Start of the reference band as a fraction of the height range"))
        .arg(Arg::with_name("MID_END").long("mid-end").takes_value(true).default_value(&default_mid_end).help("End of the reference band as a fraction of the height range"))
        .arg(Arg::with_name("MIN_POINTS_ABOVE").long("min-points-above").takes_value(true).default_value(&default_min_points_above).help("Reference band points above a floor point that protect it from removal"))
        .arg(Arg::with_name("UP_AXIS").long("up-axis").takes_value(true).possible_values(&["x", "y", "z"]).default_value(&default_up_axis).help("The height axis"))
        .arg(Arg::with_name("MASK").long("mask").help("Write a 0/1 removal mask over the input points instead of the remaining points"))
        .arg(Arg::with_name("SUMMARY").long("summary").takes_value(true).value_name("N").help("Print the N largest clusters"))
        .get_matches();

    let input_file = PathBuf::from(
        matches
            .value_of("INPUT")
            .ok_or_else(|| anyhow!("Missing input file"))?,
    );
    let output_file = PathBuf::from(
        matches
            .value_of("OUTPUT")
            .ok_or_else(|| anyhow!("Missing output file"))?,
    );
    let format = parse_value::<PointFormat>(&matches, "FORMAT")?;
    let backend = parse_value::<IndexBackend>(&matches, "INDEX")?.unwrap_or_default();

    let dbscan = if matches.is_present("SKIP_CLUSTERING") {
        None
    } else {
        Some(DbscanParams {
            radius: value_t!(matches, "RADIUS", f64)?,
            min_points: value_t!(matches, "MIN_POINTS", usize)?,
        })
    };
    let floor = if matches.is_present("SKIP_FLOOR") {
        None
    } else {
        Some(FloorFilterParams {
            floor_ratio: value_t!(matches, "FLOOR_RATIO", f64)?,
            search_radius: value_t!(matches, "SEARCH_RADIUS", f64)?,
            mid_start: value_t!(matches, "MID_START", f64)?,
            mid_end: value_t!(matches, "MID_END", f64)?,
            min_points_above: value_t!(matches, "MIN_POINTS_ABOVE", usize)?,
            up_axis: parse_value::<Axis>(&matches, "UP_AXIS")?.unwrap_or_default(),
        })
    };

    Ok(Args {
        input_file,
        output_file,
        format,
        backend,
        dbscan,
        floor,
        write_mask: matches.is_present("MASK"),
        summary: parse_value::<usize>(&matches, "SUMMARY")?,
    })
}

/// Points that survived the pipeline together with their ids in the input
struct PipelineOutput {
    points: Vec<Point>,
    input_ids: Vec<usize>,
}

impl PipelineOutput {
    fn removal_mask(&self, num_input_points: usize) -> Vec<bool> {
        let mut mask = vec![true; num_input_points];
        for id in self.input_ids.iter().copied() {
            mask[id] = false;
        }
        mask
    }
}

fn keep_largest_cluster(points: &[Point], args: &Args, params: &DbscanParams) -> PipelineOutput {
    let t_start = Instant::now();
    let index = AnyIndex::build_with(args.backend, points);
    info!(
        "Built {} index over {} points in {:.2}s",
        args.backend,
        points.len(),
        t_start.elapsed().as_secs_f64()
    );

    let t_start = Instant::now();
    let labels = dbscan_with_params(points, &index, params);
    info!("DBSCAN took {:.2}s", t_start.elapsed().as_secs_f64());

    if let Some(count) = args.summary {
        println!("Largest clusters");
        for cluster in summarize(points, &labels).iter().take(count) {
            println!(
                "\t#{:<6} {:>9} points  centroid ({:.4}, {:.4}, {:.4})  radius {:.4}",
                cluster.id,
                cluster.size,
                cluster.centroid.x,
                cluster.centroid.y,
                cluster.centroid.z,
                cluster.radius
            );
        }
    }

    match largest_cluster(&labels) {
        Some(cluster) => {
            let input_ids: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|(_, label)| **label == cluster)
                .map(|(id, _)| id)
                .collect();
            info!(
                "Keeping cluster {} with {} / {} points",
                cluster,
                input_ids.len(),
                points.len()
            );
            PipelineOutput {
                points: input_ids.iter().map(|id| points[*id]).collect(),
                input_ids,
            }
        }
        None => {
            warn!("DBSCAN found no cluster, keeping all points");
            PipelineOutput {
                points: points.to_vec(),
                input_ids: (0..points.len()).collect(),
            }
        }
    }
}

fn filter_floor(
    current: PipelineOutput,
    backend: IndexBackend,
    params: &FloorFilterParams,
) -> PipelineOutput {
    let t_start = Instant::now();
    let FilterResult {
        retained,
        removed_indices,
        ..
    } = match backend {
        IndexBackend::KdTree => remove_floor_with::<KdTree>(&current.points, params),
        IndexBackend::RStar => remove_floor_with::<RStarIndex>(&current.points, params),
        IndexBackend::Str => remove_floor_with::<StrTree>(&current.points, params),
    };
    info!("Floor removal took {:.2}s", t_start.elapsed().as_secs_f64());

    let mut removed = removed_indices.into_iter().peekable();
    let input_ids = current
        .input_ids
        .into_iter()
        .enumerate()
        .filter(|(index, _)| {
            if removed.peek() == Some(index) {
                removed.next();
                false
            } else {
                true
            }
        })
        .map(|(_, id)| id)
        .collect();
    PipelineOutput {
        points: retained,
        input_ids,
    }
}

fn run_pipeline(points: &[Point], args: &Args) -> PipelineOutput {
    let clustered = match &args.dbscan {
        Some(params) => keep_largest_cluster(points, args, params),
        None => PipelineOutput {
            points: points.to_vec(),
            input_ids: (0..points.len()).collect(),
        },
    };
    match &args.floor {
        Some(params) => filter_floor(clustered, args.backend, params),
        None => clustered,
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = get_args()?;
    let t_start = Instant::now();

    let points = read_all(&args.input_file, args.format)
        .with_context(|| format!("Could not load {}", args.input_file.display()))?;
    let output = run_pipeline(&points, &args);

    if args.write_mask {
        write_mask_to_path(&args.output_file, &output.removal_mask(points.len()))?;
        info!(
            "Wrote removal mask of {} points to {}",
            points.len(),
            args.output_file.display()
        );
    } else {
        write_all(&output.points, &args.output_file, args.format)?;
    }

    info!(
        "Kept {} / {} points, took {:.2}s",
        output.points.len(),
        points.len(),
        t_start.elapsed().as_secs_f64()
    );

    Ok(())
}
