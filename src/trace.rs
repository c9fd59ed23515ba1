//! Tracing outlines into profiles of per-scanline x-coordinates

use crate::bezier::{split_conic, split_cubic, CurvePoint, ARC_SLOTS};
use crate::decompose::{decompose_contour, OutlineSink, PointMap};
use crate::math::{fmul_div, smul_div, Precision};
use crate::outline::Outline;
use crate::pool::{RenderPool, PROFILE_COST};
use crate::profile::{Flow, Profile};
use crate::{Error, Result};

/// Direction of the section currently being traced.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
enum TraceState {
    Unknown,
    Ascending,
    Descending,
}

/// Builds the profile list of one band by walking an outline.
///
/// Each contour is cut into monotone sections. Every section writes one
/// x-coordinate per crossed scanline into the render pool and leaves a
/// [`Profile`] record behind. Sections of the same contour are chained
/// in a ring through their `next` field, which the sweep later uses to
/// recognize stubs.
pub struct ProfileBuilder<'a> {
    pool: &'a mut RenderPool,
    profiles: &'a mut Vec<Profile>,
    prec: Precision,
    /// Band bounds on the internal grid.
    min_y: i64,
    max_y: i64,
    state: TraceState,
    /// Profiles finalized so far; the record beyond them is still blank.
    num_profs: usize,
    /// First profile of the current contour.
    g_profile: Option<usize>,
    /// The current profile's start scanline is still to be filled in.
    fresh: bool,
    /// The previous trace ended exactly on a scanline, so the next one
    /// must not repeat that coordinate.
    joint: bool,
    last_x: i64,
    last_y: i64,
    arcs: [CurvePoint; ARC_SLOTS],
    /// Window base of the current arc on the stack.
    arc: isize,
}

impl<'a> ProfileBuilder<'a> {
    pub fn new(
        pool: &'a mut RenderPool,
        profiles: &'a mut Vec<Profile>,
        prec: Precision,
        min_y: i64,
        max_y: i64,
    ) -> Self {
        ProfileBuilder {
            pool,
            profiles,
            prec,
            min_y,
            max_y,
            state: TraceState::Unknown,
            num_profs: 0,
            g_profile: None,
            fresh: false,
            joint: false,
            last_x: 0,
            last_y: 0,
            arcs: [CurvePoint::default(); ARC_SLOTS],
            arc: 0,
        }
    }

    /// Convert the outline into the profile list for the current band.
    ///
    /// Returns the number of profiles; fewer than two means there is
    /// nothing to sweep in this band.
    pub fn convert(&mut self, outline: &Outline, map: PointMap) -> Result<usize> {
        self.pool.reset();
        self.profiles.clear();
        self.num_profs = 0;
        self.g_profile = None;
        self.joint = false;
        self.fresh = false;

        for c in 0..outline.contours.len() {
            self.state = TraceState::Unknown;
            self.g_profile = None;

            let (first, last) = outline.contour_range(c);
            decompose_contour(outline, first, last, map, self)?;

            // drop a doubled scanline when the contour's open and
            // closing sections meet exactly on the grid
            if self.prec.frac(self.last_y) == 0
                && self.last_y >= self.min_y
                && self.last_y <= self.max_y
            {
                if let Some(g) = self.g_profile {
                    let cur = self.profiles.len() - 1;
                    if self.profiles[g].flow == self.profiles[cur].flow {
                        self.pool.top -= 1;
                    }
                }
            }

            let last_prof = self.profiles.len().checked_sub(1);
            self.end_profile()?;

            // close the ring of sections along this contour
            if let (Some(g), Some(lp)) = (self.g_profile, last_prof) {
                self.profiles[lp].next = g;
            }
        }

        self.finalize_table()?;

        // the final y-turn may have consumed the last free slot
        if self.pool.top >= self.pool.max_buff {
            return Err(Error::Overflow);
        }

        Ok(self.num_profs)
    }

    /// Open a profile record in the given direction.
    fn new_profile(&mut self, state: TraceState) -> Result<()> {
        let first = self.profiles.is_empty();
        if first {
            self.pool.charge_header()?;
        } else {
            self.pool.check_space()?;
        }

        let flow = match state {
            TraceState::Ascending => Flow::Up,
            TraceState::Descending => Flow::Down,
            TraceState::Unknown => return Err(Error::InvalidOutline),
        };

        let record = Profile::new(flow, self.pool.top);
        if first {
            self.profiles.push(record);
        } else if let Some(cur) = self.profiles.last_mut() {
            // a blank record is always waiting after the first one
            *cur = record;
        }

        if self.g_profile.is_none() {
            self.g_profile = Some(self.profiles.len() - 1);
        }

        self.state = state;
        self.fresh = true;
        self.joint = false;

        Ok(())
    }

    /// Finalize the current profile record and leave a blank one behind
    /// for whatever section comes next.
    fn end_profile(&mut self) -> Result<()> {
        let top = self.pool.top as i64;
        let h = match self.profiles.last() {
            Some(p) => top - p.offset,
            None => 0,
        };

        if h < 0 {
            return Err(Error::NegativeHeight);
        }

        if h > 0 {
            let i = self.profiles.len() - 1;
            let flow = self.profiles[i].flow;
            self.profiles[i].height = h;
            self.profiles[i].next = i + 1;
            self.num_profs += 1;

            self.pool.top += PROFILE_COST;
            self.profiles.push(Profile::new(flow, self.pool.top));
        }

        self.pool.check_space()?;

        self.joint = false;
        Ok(())
    }

    /// Compute and store the y-turns, and point each descending profile
    /// at the top of its run so the sweep can step through it downward.
    fn finalize_table(&mut self) -> Result<()> {
        let n = self.num_profs;
        if n > 1 {
            for i in 0..n {
                let (bottom, top) = {
                    let p = &mut self.profiles[i];
                    match p.flow {
                        Flow::Down => {
                            let bottom = p.start - p.height + 1;
                            let top = p.start;
                            p.start = bottom;
                            p.offset += p.height - 1;
                            (bottom, top)
                        }
                        Flow::Up => (p.start, p.start + p.height - 1),
                    }
                };
                self.pool.insert_y_turn(bottom)?;
                self.pool.insert_y_turn(top + 1)?;
            }
        }
        Ok(())
    }

    /// Trace an ascending line, writing one x-coordinate per scanline
    /// crossed inside the band.
    fn line_up(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, miny: i64, maxy: i64) -> Result<()> {
        let mut x1 = x1;
        let dx = x2 - x1;
        let dy = y2 - y1;

        if dy <= 0 || y2 < miny || y1 > maxy {
            return Ok(());
        }

        let (mut e1, f1) = if y1 < miny {
            // the run-in can be long, so the division must not clip
            x1 += smul_div(dx, miny - y1, dy);
            (self.prec.trunc(miny), 0)
        } else {
            (self.prec.trunc(y1), self.prec.frac(y1))
        };

        let (e2, f2) = if y2 > maxy {
            (self.prec.trunc(maxy), 0)
        } else {
            (self.prec.trunc(y2), self.prec.frac(y2))
        };

        if f1 > 0 {
            if e1 == e2 {
                return Ok(());
            }
            x1 += fmul_div(dx, self.prec.unit - f1, dy);
            e1 += 1;
        } else if self.joint {
            self.pool.top -= 1;
            self.joint = false;
        }

        self.joint = f2 == 0;

        if self.fresh {
            if let Some(p) = self.profiles.last_mut() {
                p.start = e1;
            }
            self.fresh = false;
        }

        let size = (e2 - e1 + 1) as usize;
        if self.pool.top + size >= self.pool.max_buff {
            return Err(Error::Overflow);
        }

        let (ix, rx, dx) = if dx > 0 {
            ((self.prec.unit * dx) / dy, (self.prec.unit * dx) % dy, 1)
        } else {
            (-((self.prec.unit * -dx) / dy), (self.prec.unit * -dx) % dy, -1)
        };

        let mut ax = -dy;
        let mut top = self.pool.top;

        for _ in 0..size {
            self.pool.buff[top] = x1;
            top += 1;

            x1 += ix;
            ax += rx;
            if ax >= 0 {
                ax -= dy;
                x1 += dx;
            }
        }

        self.pool.top = top;
        Ok(())
    }

    /// Trace a descending line by mirroring it upward.
    fn line_down(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, miny: i64, maxy: i64) -> Result<()> {
        let fresh = self.fresh;

        let result = self.line_up(x1, -y1, x2, -y2, -maxy, -miny);

        if fresh && !self.fresh {
            if let Some(p) = self.profiles.last_mut() {
                p.start = -p.start;
            }
        }

        result
    }

    /// Trace the ascending arc sitting on the stack, flattening it into
    /// one x-coordinate per crossed scanline.
    fn bezier_up(
        &mut self,
        degree: usize,
        splitter: fn(&mut [CurvePoint]),
        miny: i64,
        maxy: i64,
    ) -> Result<()> {
        let base = self.arc as usize;
        let y1 = self.arcs[base + degree].y;
        let y2 = self.arcs[base].y;
        let mut top = self.pool.top;

        if !(y2 < miny || y1 > maxy) {
            let mut e2 = self.prec.floor(y2);
            if e2 > maxy {
                e2 = maxy;
            }

            let mut e0 = miny;
            let mut e = miny;

            if y1 >= miny {
                e = self.prec.ceiling(y1);
                let f1 = self.prec.frac(y1);
                e0 = e;

                if f1 == 0 {
                    if self.joint {
                        top -= 1;
                        self.joint = false;
                    }
                    self.pool.buff[top] = self.arcs[base + degree].x;
                    top += 1;

                    e += self.prec.unit;
                }
            }

            if self.fresh {
                if let Some(p) = self.profiles.last_mut() {
                    p.start = self.prec.trunc(e0);
                }
                self.fresh = false;
            }

            if e2 >= e {
                if top + self.prec.trunc(e2 - e) as usize + 1 >= self.pool.max_buff {
                    self.pool.top = top;
                    return Err(Error::Overflow);
                }

                let start_arc = base as isize;
                let mut arc = start_arc;

                while arc >= start_arc && e <= e2 {
                    self.joint = false;
                    let a = arc as usize;
                    let y2 = self.arcs[a].y;

                    if y2 > e {
                        let y1 = self.arcs[a + degree].y;
                        if y2 - y1 >= self.prec.step {
                            if a + 2 * degree >= ARC_SLOTS {
                                // the arc refuses to flatten; give up
                                // rather than run off the stack
                                self.pool.top = top;
                                return Err(Error::InvalidOutline);
                            }
                            splitter(&mut self.arcs[a..]);
                            arc += degree as isize;
                        } else {
                            self.pool.buff[top] = self.arcs[a + degree].x
                                + fmul_div(
                                    self.arcs[a].x - self.arcs[a + degree].x,
                                    e - y1,
                                    y2 - y1,
                                );
                            top += 1;

                            arc -= degree as isize;
                            e += self.prec.unit;
                        }
                    } else {
                        if y2 == e {
                            self.joint = true;
                            self.pool.buff[top] = self.arcs[a].x;
                            top += 1;

                            e += self.prec.unit;
                        }
                        arc -= degree as isize;
                    }
                }
            }
        }

        self.pool.top = top;
        self.arc -= degree as isize;
        Ok(())
    }

    /// Trace the descending arc on the stack by mirroring it upward.
    fn bezier_down(
        &mut self,
        degree: usize,
        splitter: fn(&mut [CurvePoint]),
        miny: i64,
        maxy: i64,
    ) -> Result<()> {
        let base = self.arc as usize;
        for p in self.arcs[base..=base + degree].iter_mut() {
            p.y = -p.y;
        }

        let fresh = self.fresh;

        let result = self.bezier_up(degree, splitter, -maxy, -miny);

        if fresh && !self.fresh {
            if let Some(p) = self.profiles.last_mut() {
                p.start = -p.start;
            }
        }

        // the end point is shared with the next arc down the stack
        self.arcs[base].y = -self.arcs[base].y;
        result
    }
}

impl<'a> OutlineSink for ProfileBuilder<'a> {
    fn move_to(&mut self, x: i64, y: i64) {
        self.last_x = x;
        self.last_y = y;
    }

    fn line_to(&mut self, x: i64, y: i64) -> Result<()> {
        // detect a change of direction
        match self.state {
            TraceState::Unknown => {
                if y > self.last_y {
                    self.new_profile(TraceState::Ascending)?;
                } else if y < self.last_y {
                    self.new_profile(TraceState::Descending)?;
                }
            }
            TraceState::Ascending => {
                if y < self.last_y {
                    self.end_profile()?;
                    self.new_profile(TraceState::Descending)?;
                }
            }
            TraceState::Descending => {
                if y > self.last_y {
                    self.end_profile()?;
                    self.new_profile(TraceState::Ascending)?;
                }
            }
        }

        match self.state {
            TraceState::Ascending => {
                self.line_up(self.last_x, self.last_y, x, y, self.min_y, self.max_y)?;
            }
            TraceState::Descending => {
                self.line_down(self.last_x, self.last_y, x, y, self.min_y, self.max_y)?;
            }
            TraceState::Unknown => {}
        }

        self.last_x = x;
        self.last_y = y;
        Ok(())
    }

    fn conic_to(&mut self, cx: i64, cy: i64, x: i64, y: i64) -> Result<()> {
        self.arc = 0;
        self.arcs[2] = CurvePoint::new(self.last_x, self.last_y);
        self.arcs[1] = CurvePoint::new(cx, cy);
        self.arcs[0] = CurvePoint::new(x, y);

        let mut x3 = x;
        let mut y3 = y;

        while self.arc >= 0 {
            let a = self.arc as usize;
            let y1 = self.arcs[a + 2].y;
            let y2 = self.arcs[a + 1].y;
            y3 = self.arcs[a].y;
            x3 = self.arcs[a].x;

            let (ymin, ymax) = if y1 <= y3 { (y1, y3) } else { (y3, y1) };

            if y2 < ymin || y2 > ymax {
                // the control point sticks out, split the arc
                if a + 4 >= ARC_SLOTS {
                    return Err(Error::InvalidOutline);
                }
                split_conic(&mut self.arcs[a..]);
                self.arc += 2;
            } else if y1 == y3 {
                // flat arc, pop it
                self.arc -= 2;
            } else {
                let dir = if y1 < y3 {
                    TraceState::Ascending
                } else {
                    TraceState::Descending
                };
                if self.state != dir {
                    if self.state != TraceState::Unknown {
                        self.end_profile()?;
                    }
                    self.new_profile(dir)?;
                }

                if dir == TraceState::Ascending {
                    self.bezier_up(2, split_conic, self.min_y, self.max_y)?;
                } else {
                    self.bezier_down(2, split_conic, self.min_y, self.max_y)?;
                }
            }
        }

        self.last_x = x3;
        self.last_y = y3;
        Ok(())
    }

    fn cubic_to(&mut self, cx1: i64, cy1: i64, cx2: i64, cy2: i64, x: i64, y: i64) -> Result<()> {
        self.arc = 0;
        self.arcs[3] = CurvePoint::new(self.last_x, self.last_y);
        self.arcs[2] = CurvePoint::new(cx1, cy1);
        self.arcs[1] = CurvePoint::new(cx2, cy2);
        self.arcs[0] = CurvePoint::new(x, y);

        let mut x4 = x;
        let mut y4 = y;

        while self.arc >= 0 {
            let a = self.arc as usize;
            let y1 = self.arcs[a + 3].y;
            let y2 = self.arcs[a + 2].y;
            let y3 = self.arcs[a + 1].y;
            y4 = self.arcs[a].y;
            x4 = self.arcs[a].x;

            let (ymin1, ymax1) = if y1 <= y4 { (y1, y4) } else { (y4, y1) };
            let (ymin2, ymax2) = if y2 <= y3 { (y2, y3) } else { (y3, y2) };

            if ymin2 < ymin1 || ymax2 > ymax1 {
                // a control point sticks out, split the arc
                if a + 6 >= ARC_SLOTS {
                    return Err(Error::InvalidOutline);
                }
                split_cubic(&mut self.arcs[a..]);
                self.arc += 3;
            } else if y1 == y4 {
                // flat arc, pop it
                self.arc -= 3;
            } else {
                let dir = if y1 <= y4 {
                    TraceState::Ascending
                } else {
                    TraceState::Descending
                };
                if self.state != dir {
                    if self.state != TraceState::Unknown {
                        self.end_profile()?;
                    }
                    self.new_profile(dir)?;
                }

                if dir == TraceState::Ascending {
                    self.bezier_up(3, split_cubic, self.min_y, self.max_y)?;
                } else {
                    self.bezier_down(3, split_cubic, self.min_y, self.max_y)?;
                }
            }
        }

        self.last_x = x4;
        self.last_y = y4;
        Ok(())
    }
}
