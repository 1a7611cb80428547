use serde::{Serialize,Deserialize};
use std::{
    fs::File,
    path::Path
};

use crate::{
    common::*,
    math::*,
    spherical::{Direction,Mode,Sphere}
};

#[derive(Clone,Serialize,Deserialize,Debug,PartialEq)]
pub struct Point {
    pub x:Real,
    pub y:Real,
    pub z:Real
}

impl From<Point> for Real3 {
    fn from(Point{ x,y,z }:Point)->Self { r3(x,y,z) }
}

fn default_samples()->usize { 1000 }
fn default_radius()->Real { 1.0 }
fn default_center()->Point { Point{ x:0.0,y:0.0,z:0.0 } }
fn default_tolerance()->Real { 0.03 }

#[derive(Clone,Serialize,Deserialize,Debug)]
pub struct Config {
    #[serde(default = "default_samples")]
    pub samples:usize,
    #[serde(default)]
    pub seed:Option<u64>,
    #[serde(default)]
    pub mode:Mode,
    #[serde(default)]
    pub direction:Direction,
    #[serde(default = "default_center")]
    pub center:Point,
    #[serde(default = "default_radius")]
    pub radius:Real,
    #[serde(default)]
    pub output:Option<String>,
    #[serde(default)]
    pub check:bool,
    #[serde(default = "default_tolerance")]
    pub tolerance:Real
}

impl Default for Config {
    fn default()->Self {
	Self {
	    samples:default_samples(),
	    seed:None,
	    mode:Mode::default(),
	    direction:Direction::default(),
	    center:default_center(),
	    radius:default_radius(),
	    output:None,
	    check:false,
	    tolerance:default_tolerance()
	}
    }
}

impl Config {
    pub fn sphere(&self)->Res<Sphere> {
	Ok(Sphere::new(self.center.clone().into(),self.radius)?
	   .with_direction(self.direction))
    }
}

pub trait Loadable {
    fn load<P:AsRef<Path>>(path:P)->Res<Self>
    where Self:Sized,for<'a> Self:Deserialize<'a> {
	let fd = File::open(path)?;
	let this : Self = ron::de::from_reader(fd)?;
	Ok(this)
    }

    fn parse(u:&str)->Res<Self>
    where Self:Sized,for<'a> Self:Deserialize<'a> {
	let this : Self = ron::de::from_str(u)?;
	Ok(this)
    }
}

impl Loadable for Config { }
